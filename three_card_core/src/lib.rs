//! # 三张牌扑克核心逻辑库
//!
//! 这个 `core` crate 包含了三张牌扑克 (Three Card Poker) 的牌型评估、
//! 派彩计算、单个连接的回合状态机，以及客户端-服务器通信消息的定义。
//! 它不关心网络和界面，只需要一个有序可靠的消息通道和一个事件日志接收端。

mod betting;
mod card;
mod dispatcher;
mod error;
mod event;
mod hand;
mod message;
mod session;

pub use betting::*;

pub use card::*;

pub use dispatcher::*;

pub use error::*;

pub use event::*;

pub use hand::*;

pub use message::*;

pub use session::*;
