use crate::error::SessionError;
use crate::event::EventSink;
use crate::message::{ClientMessage, ServerMessage};
use crate::session::GameSession;
use rand::Rng;
use rand::rngs::StdRng;

/// 收到当前阶段不接受的消息时怎么处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// 回复一条 `Rejected` 说明原因
    #[default]
    Reject,
    /// 直接丢弃，不回复也不改变状态
    Ignore,
}

/// 把一个连接上的消息转交给它自己的 `GameSession`，并产生要回复的消息。
///
/// 每个连接一个分发器，分发器之间没有任何共享状态。
pub struct SessionDispatcher<S, R = StdRng> {
    label: String,
    session: GameSession,
    sink: S,
    rng: R,
    policy: ViolationPolicy,
}

impl<S: EventSink, R: Rng> SessionDispatcher<S, R> {
    /// `label` 用于事件日志，例如 "客户端 #3"
    pub fn new(label: impl Into<String>, sink: S, rng: R) -> Self {
        SessionDispatcher {
            label: label.into(),
            session: GameSession::new(),
            sink,
            rng,
            policy: ViolationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn log(&self, event: String) {
        self.sink.record(format!("{} - {}", self.label, event));
    }

    /// 处理一条客户端消息，返回按顺序发送的回复
    pub fn dispatch(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        let result = match msg {
            ClientMessage::PlaceBets { ante, pair_plus } => self.place_bets(ante, pair_plus),
            ClientMessage::Play => self.session.play().inspect(|_| {
                self.log("选择继续 - 庄家亮牌".to_string());
            }),
            ClientMessage::Fold => self.session.fold().inspect(|_| self.log_result()),
            ClientMessage::Continue => self.session.continue_round().inspect(|_| self.log_result()),
            ClientMessage::NewGame => {
                // 不改变状态，下一次下注时才会换成新的一局
                self.log("准备开始新的一局".to_string());
                Ok(Vec::new())
            }
        };

        match result {
            Ok(replies) => replies,
            Err(SessionError::ProtocolViolation { .. }) if self.policy == ViolationPolicy::Ignore => Vec::new(),
            Err(error) => vec![ServerMessage::Rejected { error }],
        }
    }

    /// 无法解析的消息，不经过会话直接拒绝
    pub fn reject_malformed(&self, detail: impl Into<String>) -> Vec<ServerMessage> {
        vec![ServerMessage::Rejected {
            error: SessionError::MalformedMessage { detail: detail.into() },
        }]
    }

    fn place_bets(&mut self, ante: u32, pair_plus: u32) -> Result<Vec<ServerMessage>, SessionError> {
        // 上一局已经结算完，新的一局下注成功后才替换掉它
        let replies = if self.session.phase().is_settled() {
            let mut fresh = GameSession::new();
            let replies = fresh.place_bets(ante, pair_plus, &mut self.rng)?;
            self.session = fresh;
            replies
        } else {
            self.session.place_bets(ante, pair_plus, &mut self.rng)?
        };
        self.log(format!("下注: 底注 ${}, 对子加注 ${}", ante, pair_plus));
        Ok(replies)
    }

    fn log_result(&self) {
        if let Some(result) = self.session.result() {
            self.log(result.summary());
        }
    }
}
