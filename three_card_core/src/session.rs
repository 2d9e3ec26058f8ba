use crate::betting::{settle, MainOutcome, Settlement, Wagers};
use crate::card::{Card, Deck};
use crate::error::SessionError;
use crate::hand::{classify, qualifies, Hand};
use crate::message::ServerMessage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一局的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    AwaitingBets,     // 等待下注
    AwaitingDecision, // 已发牌，等待玩家选择继续或弃牌
    AwaitingContinue, // 已亮出庄家的牌，等待玩家确认结算
    Complete,         // 已结算
    Folded,           // 玩家弃牌，已结算
}

impl RoundPhase {
    /// 本局是否已经结算完毕
    pub fn is_settled(self) -> bool {
        matches!(self, RoundPhase::Complete | RoundPhase::Folded)
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            RoundPhase::AwaitingBets => "等待下注",
            RoundPhase::AwaitingDecision => "等待决定",
            RoundPhase::AwaitingContinue => "等待结算",
            RoundPhase::Complete => "已结算",
            RoundPhase::Folded => "已弃牌",
        })
    }
}

/// 已结算一局的结果，用于写事件日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Folded { lost: u64 },
    Settled { settlement: Settlement, pair_plus_bet: u32 },
}

impl RoundResult {
    pub fn net(&self) -> i64 {
        match self {
            RoundResult::Folded { lost } => -(*lost as i64),
            RoundResult::Settled { settlement, .. } => settlement.net,
        }
    }

    /// 一行可读的结果摘要
    pub fn summary(&self) -> String {
        let detail = match self {
            RoundResult::Folded { lost } => format!("弃牌，输掉 ${}", lost),
            RoundResult::Settled { settlement, pair_plus_bet } => {
                let won_pair_plus = settlement.pair_plus_payout > 0;
                let text = match settlement.outcome {
                    MainOutcome::DealerNotQualified => "庄家不合格，底注退还",
                    MainOutcome::PlayerWins if won_pair_plus => "赢了庄家，并赢得对子加注",
                    MainOutcome::PlayerWins => "赢了庄家",
                    MainOutcome::DealerWins if won_pair_plus => "输给庄家，但赢得对子加注",
                    MainOutcome::DealerWins if *pair_plus_bet > 0 => "输给庄家，对子加注也输了",
                    MainOutcome::DealerWins => "输给庄家",
                    MainOutcome::Push => "平局",
                };
                text.to_string()
            }
        };
        format!("{} | 合计: ${}", detail, self.net())
    }
}

/// 单个连接的一局游戏。
///
/// 只由所属连接的消息驱动，每条消息完整处理完（包括产生的所有回复）
/// 才会处理下一条，所以这里不需要任何锁。
/// 每一步要么完整生效并返回要发送的消息，要么返回错误且状态不变。
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: RoundPhase,
    wagers: Wagers,
    // 下注时才洗一副新牌
    deck: Option<Deck>,
    player_hand: Option<Hand>,
    dealer_hand: Option<Hand>,
    result: Option<RoundResult>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> GameSession {
        GameSession {
            phase: RoundPhase::AwaitingBets,
            wagers: Wagers::default(),
            deck: None,
            player_hand: None,
            dealer_hand: None,
            result: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn wagers(&self) -> &Wagers {
        &self.wagers
    }

    pub fn player_hand(&self) -> Option<&Hand> {
        self.player_hand.as_ref()
    }

    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.dealer_hand.as_ref()
    }

    /// 已结算时的结果
    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.as_ref().map_or(0, Deck::remaining)
    }

    fn expect_phase(&self, expected: RoundPhase, received: &str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.violation(received))
        }
    }

    fn violation(&self, received: &str) -> SessionError {
        SessionError::ProtocolViolation { phase: self.phase, received: received.to_string() }
    }

    fn hands(&self, received: &str) -> Result<(Hand, Hand), SessionError> {
        match (self.player_hand, self.dealer_hand) {
            (Some(player), Some(dealer)) => Ok((player, dealer)),
            _ => Err(self.violation(received)),
        }
    }

    /// 下注并发牌
    ///
    /// - 记录底注和对子加注，跟注清零。
    /// - 新建一副牌并洗牌，玩家和庄家轮流各发三张。
    /// - 玩家的牌正面朝上，庄家的牌背面朝上。
    pub fn place_bets<R: Rng + ?Sized>(
        &mut self,
        ante: u32,
        pair_plus: u32,
        rng: &mut R,
    ) -> Result<Vec<ServerMessage>, SessionError> {
        self.expect_phase(RoundPhase::AwaitingBets, "PlaceBets")?;
        if ante == 0 {
            return Err(SessionError::InvalidBet { ante });
        }

        self.wagers = Wagers::new(ante, pair_plus);
        let deck = self.deck.insert(Deck::shuffled(rng));
        let dealt: [Card; 6] = std::array::from_fn(|_| deck.draw(rng));
        let mut player = Hand::new([dealt[0], dealt[2], dealt[4]]);
        let mut dealer = Hand::new([dealt[1], dealt[3], dealt[5]]);
        player.set_face_up(true);
        dealer.set_face_up(false);

        self.player_hand = Some(player);
        self.dealer_hand = Some(dealer);
        self.phase = RoundPhase::AwaitingDecision;

        Ok(vec![ServerMessage::DealCards {
            player_hand: player,
            dealer_hand: dealer.view(),
            success: true,
        }])
    }

    /// 玩家选择继续：下跟注，亮出庄家的牌，但还不结算
    pub fn play(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.expect_phase(RoundPhase::AwaitingDecision, "Play")?;
        let (_, dealer) = self.hands("Play")?;

        self.wagers.play = self.wagers.ante;
        let classification = classify(&dealer);
        let qualifies = qualifies(&dealer);
        self.phase = RoundPhase::AwaitingContinue;

        Ok(vec![ServerMessage::ShowDealer {
            dealer_hand: dealer,
            classification,
            qualifies,
            message: format!(
                "庄家牌型: {} | 是否合格: {}",
                classification,
                if qualifies { "是" } else { "否" }
            ),
        }])
    }

    /// 结算：比较双方的牌，计算主注和对子加注，翻开庄家的牌
    pub fn continue_round(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.expect_phase(RoundPhase::AwaitingContinue, "Continue")?;
        let (player, mut dealer) = self.hands("Continue")?;

        let settlement = settle(&dealer, &player, &self.wagers);
        dealer.set_face_up(true);
        self.dealer_hand = Some(dealer);

        let result = RoundResult::Settled { settlement, pair_plus_bet: self.wagers.pair_plus };
        self.result = Some(result);
        self.phase = RoundPhase::Complete;

        let message = format!("{} 对子加注: ${}", settlement.outcome, settlement.pair_plus_payout);
        Ok(vec![
            ServerMessage::GameResult {
                net_winnings: settlement.net,
                message: message.clone(),
                player_hand: player,
                dealer_hand: dealer.view(),
            },
            ServerMessage::RoundComplete { net_winnings: settlement.net, message },
        ])
    }

    /// 弃牌：无条件输掉底注和对子加注，不评估任何一手牌
    pub fn fold(&mut self) -> Result<Vec<ServerMessage>, SessionError> {
        self.expect_phase(RoundPhase::AwaitingDecision, "Fold")?;
        let (player, dealer) = self.hands("Fold")?;

        let lost = u64::from(self.wagers.ante) + u64::from(self.wagers.pair_plus);
        let result = RoundResult::Folded { lost };
        self.result = Some(result);
        self.phase = RoundPhase::Folded;

        Ok(vec![
            ServerMessage::GameResult {
                net_winnings: result.net(),
                message: "你弃牌了，输掉底注和对子加注。".to_string(),
                player_hand: player,
                dealer_hand: dealer.view(),
            },
            ServerMessage::RoundComplete {
                net_winnings: result.net(),
                message: "弃牌 - 输掉下注".to_string(),
            },
        ])
    }
}

// --- 单元测试 ---
