use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use three_card_core::{ClientMessage, HandView, ServerMessage};

#[derive(Parser, Debug)]
#[command(about = "三张牌扑克命令行客户端")]
struct Cli {
    /// 服务器地址
    #[arg(long, default_value = "ws://127.0.0.1:5555/ws")]
    url: Url,
}

/// 用户在命令行输入的一行
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Send(ClientMessage),
    Help,
    Exit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let amount = |idx: usize, name: &str| -> Result<u32, String> {
        match parts.get(idx) {
            None => Ok(0),
            Some(s) => s.parse().map_err(|_| format!("无效的{}: {}", name, s)),
        }
    };

    match parts.first().copied() {
        Some("bet") => {
            if parts.len() < 2 {
                return Err("用法: bet <底注> [对子加注]".to_string());
            }
            let ante = amount(1, "底注")?;
            let pair_plus = amount(2, "对子加注")?;
            Ok(Command::Send(ClientMessage::PlaceBets { ante, pair_plus }))
        }
        Some("play") => Ok(Command::Send(ClientMessage::Play)),
        Some("fold") => Ok(Command::Send(ClientMessage::Fold)),
        Some("continue") => Ok(Command::Send(ClientMessage::Continue)),
        Some("new") => Ok(Command::Send(ClientMessage::NewGame)),
        Some("help") => Ok(Command::Help),
        Some("exit") => Ok(Command::Exit),
        _ => Err(format!("未知命令: {}", line.trim())),
    }
}

fn render_view(view: &HandView) -> String {
    view.iter()
        .map(|card| card.map_or("🂠".to_string(), |c| c.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 把服务器消息整理成适合在终端里显示的文字
fn render(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::DealCards { player_hand, dealer_hand, .. } => format!(
            "发牌完成\n  你的牌: {}\n  庄家的牌: {}\n输入 play 继续，或 fold 弃牌",
            player_hand,
            render_view(dealer_hand)
        ),
        ServerMessage::ShowDealer { dealer_hand, message, .. } => {
            format!("庄家亮牌: {}\n  {}\n输入 continue 查看结果", dealer_hand, message)
        }
        ServerMessage::GameResult { net_winnings, message, player_hand, dealer_hand } => format!(
            "本局结果\n  你的牌: {}\n  庄家的牌: {}\n  {}\n  净输赢: ${}",
            player_hand,
            render_view(dealer_hand),
            message,
            net_winnings
        ),
        ServerMessage::RoundComplete { net_winnings, .. } => {
            format!("本局结束 (净输赢 ${})，输入 new 或直接 bet 开始新的一局", net_winnings)
        }
        ServerMessage::Rejected { error } => format!("服务器拒绝: {}", error),
    }
}

fn print_help() {
    println!("可用命令:");
    println!("  bet <底注> [对子加注]     - 下注并发牌");
    println!("  play                      - 跟注 (等于底注)，亮出庄家的牌");
    println!("  fold                      - 弃牌");
    println!("  continue                  - 结算本局");
    println!("  new                       - 准备新的一局");
    println!("  help                      - 显示帮助");
    println!("  exit                      - 退出");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("正在连接到: {}", cli.url);
    let (ws_stream, _) = connect_async(cli.url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(server_msg) => {
                        println!("\n<-- {}\n", render(&server_msg));
                        print!("> "); // 重新显示输入提示符
                        let _ = std::io::stdout().flush();
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(Message::Close(_)) => {
                    println!("\n服务器关闭了连接");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- 三张牌扑克客户端 ---");
    print_help();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Send(msg)) => {
                let payload = serde_json::to_string(&msg)?;
                write.send(Message::Text(payload.into())).await?;
            }
            Ok(Command::Help) => print_help(),
            Ok(Command::Exit) => {
                println!("正在断开连接...");
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
