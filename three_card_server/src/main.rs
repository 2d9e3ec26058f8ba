use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::Parser;
use dashmap::DashMap;
use futures_util::{stream::StreamExt, SinkExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use three_card_core::{ClientMessage, ServerMessage, SessionDispatcher, ViolationPolicy};

type ClientId = Uuid;

#[derive(Parser, Debug)]
#[command(about = "三张牌扑克服务器")]
struct Cli {
    /// 监听地址
    #[arg(long, default_value = "0.0.0.0")]
    address: String,
    #[arg(long, short, default_value_t = 5555)]
    port: u16,
    /// 收到当前阶段不接受的消息时直接丢弃，不回复
    #[arg(long)]
    silent_violations: bool,
}

// 服务器全局状态。每个连接的牌局只属于它自己的任务，这里只登记在线的连接。
struct AppState {
    // 在线连接 -> 按连接顺序分配的编号，用于日志里的 "客户端 #N"
    clients: DashMap<ClientId, u32>,
    next_number: AtomicU32,
    policy: ViolationPolicy,
}

type SharedState = Arc<AppState>;

impl AppState {
    fn new(policy: ViolationPolicy) -> Self {
        AppState {
            clients: DashMap::new(),
            next_number: AtomicU32::new(1),
            policy,
        }
    }

    fn register(&self, id: ClientId) -> u32 {
        let number = self.next_number.fetch_add(1, Ordering::Relaxed);
        self.clients.insert(id, number);
        number
    }

    fn unregister(&self, id: &ClientId) {
        self.clients.remove(id);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let policy = if cli.silent_violations { ViolationPolicy::Ignore } else { ViolationPolicy::Reject };
    let state = SharedState::new(AppState::new(policy));

    let addr: SocketAddr = format!("{}:{}", cli.address, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("服务器正在监听 {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("服务器已停止");
    Ok(())
}

fn app(state: SharedState) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let client_id = Uuid::new_v4();
    let number = state.register(client_id);
    let label = format!("客户端 #{}", number);
    info!("{} 已连接，当前在线 {} 个", label, state.clients.len());

    let (mut sender, mut receiver) = socket.split();

    // 创建一个 MPSC 通道，回复按顺序交给写任务
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match encode(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    // 少发一条回复会打乱一问一答的顺序，直接结束连接
                    warn!("序列化消息失败，关闭连接: {}", e);
                    break;
                }
            };
            if sender.send(payload).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    // 这个连接自己的牌局，事件直接写进日志
    let sink = |event: String| info!("{}", event);
    let mut dispatcher = SessionDispatcher::new(label.clone(), sink, StdRng::from_os_rng())
        .with_policy(state.policy);

    // 主循环，一次只处理一条消息，回复全部交给写任务后再读下一条
    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("{} 连接出错: {}", label, e);
                break;
            }
        };

        let replies = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(msg) => {
                debug!("{} -> {:?}", label, msg);
                dispatcher.dispatch(msg)
            }
            Err(e) => {
                warn!("{} 解析消息失败: {}", label, e);
                dispatcher.reject_malformed(e.to_string())
            }
        };

        if !deliver(&tx, replies, &label).await {
            break;
        }
    }

    // 客户端断开连接，丢弃牌局，不做任何回滚
    drop(tx);
    if let Err(e) = writer.await {
        warn!("{} 的写任务异常退出: {}", label, e);
    }
    state.unregister(&client_id);
    info!("{} 已断开，当前在线 {} 个", label, state.clients.len());
}

fn encode(msg: &ServerMessage) -> serde_json::Result<Message> {
    serde_json::to_string(msg).map(|payload| Message::Text(payload.into()))
}

/// 按顺序把回复交给写任务，写任务已退出时返回 false
async fn deliver(tx: &mpsc::Sender<ServerMessage>, replies: Vec<ServerMessage>, label: &str) -> bool {
    for reply in replies {
        if let ServerMessage::Rejected { error } = &reply {
            info!("{} 的消息被拒绝: {}", label, error);
        }
        if tx.send(reply).await.is_err() {
            warn!("向 {} 发送消息失败（可能已断开）", label);
            return false;
        }
    }
    true
}
