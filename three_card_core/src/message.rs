use crate::error::SessionError;
use crate::hand::{Hand, HandClass, HandView};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 严格一问一答：客户端发一条，等服务器回完再发下一条。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 下底注和对子加注，开始新的一局
    PlaceBets { ante: u32, pair_plus: u32 },
    /// 看完自己的牌后选择继续，跟注等于底注
    Play,
    /// 弃牌，输掉底注和对子加注
    Fold,
    /// 看完庄家的牌后请求结算
    Continue,
    /// 准备开始新的一局 (不改变状态，下一次 PlaceBets 会开新局)
    NewGame,
}

impl ClientMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::PlaceBets { .. } => "PlaceBets",
            ClientMessage::Play => "Play",
            ClientMessage::Fold => "Fold",
            ClientMessage::Continue => "Continue",
            ClientMessage::NewGame => "NewGame",
        }
    }
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// 发牌完成。庄家的牌背面朝上，视图里全是 None。
    DealCards {
        player_hand: Hand,
        dealer_hand: HandView,
        success: bool,
    },

    /// 玩家选择继续后亮出庄家的牌。
    /// 牌面已经公开，但在结算前仍视为背面朝上。
    ShowDealer {
        dealer_hand: Hand,
        classification: HandClass,
        qualifies: bool,
        message: String,
    },

    /// 本局结果。弃牌时庄家的牌依然隐藏。
    GameResult {
        net_winnings: i64,
        message: String,
        player_hand: Hand,
        dealer_hand: HandView,
    },

    /// 本局结束，紧跟在 GameResult 之后
    RoundComplete { net_winnings: i64, message: String },

    /// 服务器拒绝了上一条消息
    Rejected { error: SessionError },
}
