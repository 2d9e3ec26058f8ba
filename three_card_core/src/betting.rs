use crate::hand::{classify, compare, qualifies, Hand, HandClass};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 一局的三种下注
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wagers {
    pub ante: u32,      // 底注
    pub pair_plus: u32, // 对子加注 (边注，只看玩家自己的牌)
    pub play: u32,      // 跟注，选择继续时等于底注，弃牌时为 0
}

impl Wagers {
    pub fn new(ante: u32, pair_plus: u32) -> Wagers {
        Wagers { ante, pair_plus, play: 0 }
    }

    /// 本局投入的总筹码
    pub fn total(&self) -> u64 {
        u64::from(self.ante) + u64::from(self.pair_plus) + u64::from(self.play)
    }
}

/// 主注 (底注 + 跟注) 的结算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainOutcome {
    DealerNotQualified,
    PlayerWins,
    DealerWins,
    Push,
}

impl fmt::Display for MainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            MainOutcome::DealerNotQualified => "庄家不合格，退还底注，跟注平局。",
            MainOutcome::PlayerWins => "你赢了庄家！",
            MainOutcome::DealerWins => "庄家获胜。",
            MainOutcome::Push => "平局！",
        })
    }
}

/// 一局的完整结算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: MainOutcome,
    pub main_payout: u64,
    pub pair_plus_payout: u64,
    pub net: i64,
}

/// 对子加注的赔率
pub fn pair_plus_multiplier(class: HandClass) -> u64 {
    match class {
        HandClass::StraightFlush => 40,
        HandClass::ThreeOfAKind => 30,
        HandClass::Straight => 6,
        HandClass::Flush => 3,
        HandClass::Pair => 1,
        HandClass::HighCard => 0,
    }
}

/// 对子加注的派彩。没有下注时不评估牌型，直接返回 0。
pub fn pair_plus_payout(hand: &Hand, bet: u32) -> u64 {
    if bet == 0 {
        return 0;
    }
    u64::from(bet) * pair_plus_multiplier(classify(hand))
}

/// 结算主注，返回 (派彩, 结果)。派彩包含退还的本金。
pub fn resolve_main_wager(dealer: &Hand, player: &Hand, ante: u32, play: u32) -> (u64, MainOutcome) {
    let ante = u64::from(ante);
    let play = u64::from(play);

    if !qualifies(dealer) {
        // 庄家不合格，不比牌，派彩只有底注
        return (ante, MainOutcome::DealerNotQualified);
    }

    match compare(dealer, player) {
        Ordering::Less => (2 * (ante + play), MainOutcome::PlayerWins),
        Ordering::Greater => (0, MainOutcome::DealerWins),
        Ordering::Equal => (ante + play, MainOutcome::Push),
    }
}

/// 本局净输赢：派彩减去全部投入，负数表示净亏
pub fn net_result(wagers: &Wagers, main_payout: u64, pair_plus_payout: u64) -> i64 {
    (main_payout + pair_plus_payout) as i64 - wagers.total() as i64
}

/// 亮牌后结算整局
pub fn settle(dealer: &Hand, player: &Hand, wagers: &Wagers) -> Settlement {
    let (main_payout, outcome) = resolve_main_wager(dealer, player, wagers.ante, wagers.play);
    let pair_plus_payout = pair_plus_payout(player, wagers.pair_plus);
    Settlement {
        outcome,
        main_payout,
        pair_plus_payout,
        net: net_result(wagers, main_payout, pair_plus_payout),
    }
}

// --- 单元测试 ---
