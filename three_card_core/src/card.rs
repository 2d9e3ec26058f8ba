use rand::Rng;
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
// --- 核心数据结构定义 ---

/// 花色 (Suit)，三张牌扑克中花色之间没有大小之分
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Hearts,   // 红心 ♥️
    Diamonds, // 方块 ♦️
    Clubs,    // 梅花 ♣️
    Spades,   // 黑桃 ♠️
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// 点数 (Rank)
/// 线上传输时是 1..=13 的整数：1 是 Ace，11~13 是 J/Q/K。
/// 注意这里不派生 Ord：Ace 什么时候算大、什么时候算小由牌型评估决定。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("无效的点数 {0}，必须在 1 到 13 之间")]
pub struct InvalidRank(pub u8);

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King,
    ];

    /// 牌面数值，Ace 为 1
    pub fn value(self) -> u8 {
        self as u8
    }

    /// 比大小时使用的数值，Ace 当作 14
    pub fn high_value(self) -> u8 {
        match self {
            Rank::Ace => 14,
            other => other.value(),
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.value()
    }
}

impl TryFrom<u8> for Rank {
    type Error = InvalidRank;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=13 => Ok(Rank::ALL[value as usize - 1]),
            _ => Err(InvalidRank(value)),
        }
    }
}

/// 单张扑克牌 (Card)
/// `face_up` 只影响展示给客户端的内容，永远不参与牌力评估。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub face_up: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Card {
        Card { suit, rank, face_up: false }
    }

    /// 花色和点数相同即为同一张牌，不管正反面
    pub fn same_card(&self, other: &Card) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Hearts => "♥️",
            Suit::Diamonds => "♦️",
            Suit::Clubs => "♣️",
            Suit::Spades => "♠️",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

// --- 牌堆 ---

/// 一副 52 张的牌，加上一个发牌游标。
/// 每局新建、洗一次、发完本局的牌后丢弃。
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    pub const SIZE: usize = 52;

    /// 按花色、点数顺序创建一副未洗的牌
    pub fn build() -> Deck {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Deck { cards, cursor: 0 }
    }

    /// 创建并洗好一副新牌
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut deck = Deck::build();
        deck.shuffle(rng);
        deck
    }

    /// 对整副牌做均匀随机排列，游标归零
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.cursor = 0;
    }

    /// 发出游标处的牌。
    ///
    /// 牌发完时会原地重洗再继续发，所以永远不会失败；
    /// 代价是超过 52 张之后已发出的牌可能再次出现。
    /// 一局只发 6 张，正常流程走不到这里。
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Card {
        if self.cursor >= self.cards.len() {
            self.shuffle(rng);
        }
        let card = self.cards[self.cursor];
        self.cursor += 1;
        card
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }
}

// --- 单元测试 ---
