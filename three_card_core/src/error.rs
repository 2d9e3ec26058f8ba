use crate::session::RoundPhase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 会话拒绝一条客户端消息的原因，会原样发回给客户端
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    /// 消息到达时当前阶段不接受它
    #[error("当前阶段 ({phase}) 不能处理 {received} 消息")]
    ProtocolViolation { phase: RoundPhase, received: String },

    /// 底注必须为正数
    #[error("无效下注: 底注必须大于 0，收到 {ante}")]
    InvalidBet { ante: u32 },

    #[error("无法解析的消息: {detail}")]
    MalformedMessage { detail: String },
}
