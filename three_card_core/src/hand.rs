use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 三张牌的一手牌，保留发牌顺序用于展示，评估时与顺序无关
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Hand([Card; 3]);

/// 发给客户端的手牌视图，背面朝上的牌为 `None`
pub type HandView = [Option<Card>; 3];

/// 牌型等级 (HandClass)
/// 变体从弱到强排列，直接派生 `Ord` 用于比较。
/// 注意这个玩法里同花排在顺子之前（比顺子弱），和五张牌扑克不同。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum HandClass {
    HighCard,      // 高牌
    Pair,          // 对子
    Flush,         // 同花
    Straight,      // 顺子
    ThreeOfAKind,  // 三条
    StraightFlush, // 同花顺
}

impl Hand {
    pub fn new(cards: [Card; 3]) -> Hand {
        Hand(cards)
    }

    pub fn cards(&self) -> &[Card; 3] {
        &self.0
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.0.iter_mut().for_each(|card| card.face_up = face_up);
    }

    /// 隐藏背面朝上的牌，得到可以发给客户端的视图
    pub fn view(&self) -> HandView {
        self.0.map(|card| card.face_up.then_some(card))
    }

    fn values(&self) -> [u8; 3] {
        self.0.map(|card| card.rank.value())
    }

    /// Ace 记为 14，从大到小排序，用于同牌型比较
    fn kickers(&self) -> [u8; 3] {
        let mut values = self.0.map(|card| card.rank.high_value());
        values.sort_unstable_by(|a, b| b.cmp(a));
        values
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c] = &self.0;
        write!(f, "{} {} {}", a, b, c)
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            HandClass::HighCard => "高牌",
            HandClass::Pair => "对子",
            HandClass::Flush => "同花",
            HandClass::Straight => "顺子",
            HandClass::ThreeOfAKind => "三条",
            HandClass::StraightFlush => "同花顺",
        })
    }
}

// --- 牌型评估逻辑 ---

fn is_flush(hand: &Hand) -> bool {
    hand.0.windows(2).all(|w| w[0].suit == w[1].suit)
}

/// 排序后连续，或者正好是 A-2-3。没有 Q-K-A 这种绕回的顺子。
fn is_straight(hand: &Hand) -> bool {
    let mut values = hand.values();
    values.sort_unstable();
    values.windows(2).all(|w| w[0] + 1 == w[1]) || values == [1, 2, 3]
}

fn is_three_of_a_kind(hand: &Hand) -> bool {
    hand.0.windows(2).all(|w| w[0].rank == w[1].rank)
}

/// 三张牌里恰好有两种点数
fn is_pair(hand: &Hand) -> bool {
    let [a, b, c] = hand.values();
    let distinct = 1 + usize::from(b != a) + usize::from(c != a && c != b);
    distinct == 2
}

/// 评估一手三张牌的牌型
pub fn classify(hand: &Hand) -> HandClass {
    let flush = is_flush(hand);
    let straight = is_straight(hand);

    if straight && flush {
        HandClass::StraightFlush
    } else if is_three_of_a_kind(hand) {
        HandClass::ThreeOfAKind
    } else if straight {
        HandClass::Straight
    } else if flush {
        HandClass::Flush
    } else if is_pair(hand) {
        HandClass::Pair
    } else {
        HandClass::HighCard
    }
}

/// 庄家是否合格：对子或以上，或者最大牌至少是 Q（Ace 在这里算最大）
pub fn qualifies(hand: &Hand) -> bool {
    if classify(hand) >= HandClass::Pair {
        return true;
    }
    hand.kickers()[0] >= 12
}

/// 比较两手牌：`Greater` 表示 `a` 赢，`Less` 表示 `a` 输，`Equal` 为平局。
///
/// 先比牌型；牌型相同时把 Ace 当作 14，从大到小逐张比较。
/// 花色永远不参与比较。
pub fn compare(a: &Hand, b: &Hand) -> Ordering {
    classify(a)
        .cmp(&classify(b))
        .then_with(|| a.kickers().cmp(&b.kickers()))
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Deck, Rank, Suit};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use Rank::*;
    use Suit::*;

    fn hand(cards: [(Suit, Rank); 3]) -> Hand {
        Hand::new(cards.map(|(suit, rank)| Card::new(suit, rank)))
    }

    fn permutations(h: &Hand) -> Vec<Hand> {
        let [a, b, c] = *h.cards();
        vec![
            Hand::new([a, b, c]),
            Hand::new([a, c, b]),
            Hand::new([b, a, c]),
            Hand::new([b, c, a]),
            Hand::new([c, a, b]),
            Hand::new([c, b, a]),
        ]
    }

    #[test]
    fn test_straight_flush() {
        let h = hand([(Hearts, Ten), (Hearts, Nine), (Hearts, Eight)]);
        assert_eq!(classify(&h), HandClass::StraightFlush);
    }

    #[test]
    fn test_three_of_a_kind() {
        let h = hand([(Hearts, Seven), (Diamonds, Seven), (Clubs, Seven)]);
        assert_eq!(classify(&h), HandClass::ThreeOfAKind);
    }

    #[test]
    fn test_straight() {
        let h = hand([(Hearts, Six), (Diamonds, Five), (Clubs, Four)]);
        assert_eq!(classify(&h), HandClass::Straight);
    }

    #[test]
    fn test_ace_low_straight() {
        let h = hand([(Hearts, Ace), (Diamonds, Two), (Clubs, Three)]);
        assert_eq!(classify(&h), HandClass::Straight);

        let h = hand([(Spades, Three), (Spades, Ace), (Spades, Two)]);
        assert_eq!(classify(&h), HandClass::StraightFlush);
    }

    #[test]
    fn test_no_wraparound_straight() {
        let h = hand([(Hearts, Queen), (Diamonds, King), (Clubs, Ace)]);
        assert_eq!(classify(&h), HandClass::HighCard);

        let h = hand([(Hearts, King), (Diamonds, Ace), (Clubs, Two)]);
        assert_eq!(classify(&h), HandClass::HighCard);
    }

    #[test]
    fn test_flush() {
        let h = hand([(Spades, King), (Spades, Nine), (Spades, Seven)]);
        assert_eq!(classify(&h), HandClass::Flush);
    }

    #[test]
    fn test_pair_and_high_card() {
        let h = hand([(Hearts, King), (Diamonds, King), (Clubs, Nine)]);
        assert_eq!(classify(&h), HandClass::Pair);

        let h = hand([(Hearts, Ace), (Diamonds, King), (Clubs, Seven)]);
        assert_eq!(classify(&h), HandClass::HighCard);
    }

    #[test]
    fn test_flush_beats_pair_and_straight_beats_flush() {
        assert!(HandClass::Flush > HandClass::Pair);
        assert!(HandClass::Straight > HandClass::Flush);
        assert!(HandClass::ThreeOfAKind > HandClass::Straight);
        assert!(HandClass::StraightFlush > HandClass::ThreeOfAKind);
    }

    #[test]
    fn test_classify_ignores_card_order() {
        let hands = [
            hand([(Hearts, Ace), (Diamonds, Two), (Clubs, Three)]),
            hand([(Hearts, King), (Diamonds, King), (Clubs, Nine)]),
            hand([(Clubs, Jack), (Clubs, Four), (Clubs, Two)]),
            hand([(Spades, Queen), (Spades, Jack), (Spades, King)]),
        ];
        for h in &hands {
            let expected = classify(h);
            for p in permutations(h) {
                assert_eq!(classify(&p), expected, "{}", p);
            }
        }
    }

    #[test]
    fn test_classify_every_rank_triple() {
        // 花色固定为三种不同的，只看点数组合
        for &a in &Rank::ALL {
            for &b in &Rank::ALL {
                for &c in &Rank::ALL {
                    let h = hand([(Hearts, a), (Diamonds, b), (Clubs, c)]);
                    let class = classify(&h);
                    assert_ne!(class, HandClass::Flush);
                    assert_ne!(class, HandClass::StraightFlush);
                    if a == b && b == c {
                        assert_eq!(class, HandClass::ThreeOfAKind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_dealer_qualification() {
        let jack_high = hand([(Hearts, Jack), (Diamonds, Nine), (Clubs, Seven)]);
        assert!(!qualifies(&jack_high));

        let queen_high = hand([(Hearts, Queen), (Diamonds, Eight), (Clubs, Five)]);
        assert!(qualifies(&queen_high));

        let king_high = hand([(Hearts, King), (Diamonds, Four), (Clubs, Two)]);
        assert!(qualifies(&king_high));

        let ace_high = hand([(Hearts, Ace), (Diamonds, Four), (Clubs, Six)]);
        assert!(qualifies(&ace_high));

        let low_pair = hand([(Hearts, Two), (Diamonds, Two), (Clubs, Four)]);
        assert!(qualifies(&low_pair));
    }

    #[test]
    fn test_compare_by_class_first() {
        let pair = hand([(Hearts, Two), (Diamonds, Two), (Clubs, Four)]);
        let ace_high = hand([(Hearts, Ace), (Diamonds, King), (Clubs, Jack)]);
        assert_eq!(compare(&pair, &ace_high), Ordering::Greater);
        assert_eq!(compare(&ace_high, &pair), Ordering::Less);
    }

    #[test]
    fn test_compare_kickers_with_ace_high() {
        let ace_high = hand([(Hearts, Ace), (Diamonds, Four), (Clubs, Two)]);
        let king_high = hand([(Hearts, King), (Diamonds, Queen), (Clubs, Nine)]);
        assert_eq!(classify(&king_high), HandClass::HighCard);
        assert_eq!(compare(&ace_high, &king_high), Ordering::Greater);
        assert_eq!(compare(&king_high, &ace_high), Ordering::Less);

        let k_q_nine = hand([(Hearts, King), (Diamonds, Queen), (Clubs, Nine)]);
        let k_q_eight = hand([(Spades, King), (Clubs, Queen), (Hearts, Eight)]);
        assert_eq!(compare(&k_q_nine, &k_q_eight), Ordering::Greater);
    }

    #[test]
    fn test_compare_straights_with_ace_as_high_card() {
        // A-2-3 按 14-3-2 比较，比 K-Q-J 大
        let ace_low = hand([(Hearts, Ace), (Diamonds, Two), (Clubs, Three)]);
        let king_high = hand([(Spades, King), (Hearts, Queen), (Diamonds, Jack)]);
        assert_eq!(classify(&ace_low), HandClass::Straight);
        assert_eq!(classify(&king_high), HandClass::Straight);
        assert_eq!(compare(&ace_low, &king_high), Ordering::Greater);
        assert_eq!(compare(&king_high, &ace_low), Ordering::Less);
    }

    #[test]
    fn test_compare_ignores_suits() {
        let a = hand([(Hearts, King), (Diamonds, Nine), (Clubs, Five)]);
        let b = hand([(Spades, Five), (Hearts, King), (Clubs, Nine)]);
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        // 未洗的牌给出同花顺，洗过的牌给出各种杂牌，再补几手对子和三条
        let mut rng = StdRng::seed_from_u64(42);
        let mut ordered = Deck::build();
        let mut shuffled = Deck::shuffled(&mut rng);
        let mut hands: Vec<Hand> = Vec::new();
        for deck in [&mut ordered, &mut shuffled] {
            for _ in 0..17 {
                hands.push(Hand::new([deck.draw(&mut rng), deck.draw(&mut rng), deck.draw(&mut rng)]));
            }
        }
        hands.push(hand([(Hearts, Nine), (Diamonds, Nine), (Clubs, Ace)]));
        hands.push(hand([(Spades, Nine), (Clubs, Nine), (Hearts, Ace)]));
        hands.push(hand([(Hearts, Four), (Diamonds, Four), (Clubs, Four)]));

        for a in &hands {
            assert_eq!(compare(a, a), Ordering::Equal);
            for b in &hands {
                assert_eq!(compare(a, b), compare(b, a).reverse(), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_view_hides_face_down_cards() {
        let mut h = hand([(Hearts, Ace), (Diamonds, Two), (Clubs, Three)]);
        assert_eq!(h.view(), [None, None, None]);

        h.set_face_up(true);
        assert!(h.view().iter().all(Option::is_some));
    }
}
