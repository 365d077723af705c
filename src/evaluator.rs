use crate::cards::{Card, Rank};
use core::fmt;

/// Poker hand category. The discriminant is the category's rank, where a
/// lower number is a stronger hand (Royal Flush = 1, High Card = 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    RoyalFlush = 1,
    StraightFlush = 2,
    FourOfAKind = 3,
    FullHouse = 4,
    Flush = 5,
    Straight = 6,
    ThreeOfAKind = 7,
    TwoPair = 8,
    OnePair = 9,
    HighCard = 10,
}

impl Category {
    /// All categories in match priority order, strongest first.
    pub const ALL: [Category; 10] = [
        Category::RoyalFlush,
        Category::StraightFlush,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::Flush,
        Category::Straight,
        Category::ThreeOfAKind,
        Category::TwoPair,
        Category::OnePair,
        Category::HighCard,
    ];

    /// Category rank, 1 (strongest) through 10 (weakest).
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::RoyalFlush => "Royal Flush",
            Category::StraightFlush => "Straight Flush",
            Category::FourOfAKind => "Four of a Kind",
            Category::FullHouse => "Full House",
            Category::Flush => "Flush",
            Category::Straight => "Straight",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::TwoPair => "Two Pair",
            Category::OnePair => "One Pair",
            Category::HighCard => "High Card",
        }
    }

    /// Strength ordering: `Greater` means `self` beats `other`.
    pub fn cmp_strength(self, other: Category) -> core::cmp::Ordering {
        other.rank().cmp(&self.rank())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified five-card hand. Each variant carries exactly the key
/// material its category is tiebroken on; see [`crate::tiebreak`].
///
/// Four of a Kind, Full House and Three of a Kind only keep the rank of
/// the largest group. Kickers never split those categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HandRank {
    RoyalFlush,
    /// `high` is 5 for the steel wheel.
    StraightFlush { high: Rank },
    FourOfAKind { quad: Rank },
    FullHouse { trips: Rank },
    /// Ranks sorted descending.
    Flush { ranks: [Rank; 5] },
    /// `high` is 5 for the wheel A-2-3-4-5.
    Straight { high: Rank },
    ThreeOfAKind { trips: Rank },
    /// Pair ranks descending, then the odd card.
    TwoPair { pairs: [Rank; 2], kicker: Rank },
    /// Kickers sorted descending.
    OnePair { pair: Rank, kickers: [Rank; 3] },
    /// Ranks sorted descending.
    HighCard { ranks: [Rank; 5] },
}

impl HandRank {
    pub const fn category(&self) -> Category {
        match self {
            HandRank::RoyalFlush => Category::RoyalFlush,
            HandRank::StraightFlush { .. } => Category::StraightFlush,
            HandRank::FourOfAKind { .. } => Category::FourOfAKind,
            HandRank::FullHouse { .. } => Category::FullHouse,
            HandRank::Flush { .. } => Category::Flush,
            HandRank::Straight { .. } => Category::Straight,
            HandRank::ThreeOfAKind { .. } => Category::ThreeOfAKind,
            HandRank::TwoPair { .. } => Category::TwoPair,
            HandRank::OnePair { .. } => Category::OnePair,
            HandRank::HighCard { .. } => Category::HighCard,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.category().name()
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("hand evaluation needs exactly 5 cards, got {0}")]
    CardCount(usize),
}

/// Evaluate a slice that the caller claims holds five cards.
pub fn try_evaluate(cards: &[Card]) -> Result<HandRank, EvalError> {
    let five: &[Card; 5] = cards.try_into().map_err(|_| EvalError::CardCount(cards.len()))?;
    Ok(evaluate_five(five))
}

/// Classify exactly five cards into the first matching category, checked
/// strongest first, together with that category's tiebreak key.
///
/// ```
/// use draw_poker::cards::parse_cards;
/// use draw_poker::evaluator::{try_evaluate, Category};
///
/// let cards = parse_cards("Ah Kh Qh Jh 10h").unwrap();
/// let rank = try_evaluate(&cards).unwrap();
/// assert_eq!(rank.category(), Category::RoyalFlush);
/// assert_eq!(rank.category().rank(), 1);
/// ```
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let mut asc = cards.map(Card::rank);
    asc.sort_unstable();
    let mut desc = asc;
    desc.reverse();

    // (rank, count) for every rank present, highest rank first
    let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for r in desc {
        match groups.last_mut() {
            Some((last, n)) if *last == r => *n += 1,
            _ => groups.push((r, 1)),
        }
    }
    let ranks_with = |n: u8| groups.iter().filter(move |(_, c)| *c == n).map(|(r, _)| *r);

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = straight_high(&asc);

    if is_flush && asc.iter().all(|r| r.value() > 9) {
        return HandRank::RoyalFlush;
    }
    if let (true, Some(high)) = (is_flush, straight_high) {
        return HandRank::StraightFlush { high };
    }
    if let Some(quad) = ranks_with(4).next() {
        return HandRank::FourOfAKind { quad };
    }
    if let (Some(trips), Some(_)) = (ranks_with(3).next(), ranks_with(2).next()) {
        return HandRank::FullHouse { trips };
    }
    if is_flush {
        return HandRank::Flush { ranks: desc };
    }
    if let Some(high) = straight_high {
        return HandRank::Straight { high };
    }
    if let Some(trips) = ranks_with(3).next() {
        return HandRank::ThreeOfAKind { trips };
    }
    match groups.len() {
        3 => {
            let mut pairs = ranks_with(2);
            let (hi, lo) = (pairs.next(), pairs.next());
            let kicker = ranks_with(1).next();
            if let (Some(hi), Some(lo), Some(kicker)) = (hi, lo, kicker) {
                return HandRank::TwoPair { pairs: [hi, lo], kicker };
            }
        }
        4 => {
            let pair = ranks_with(2).next();
            let mut singles = ranks_with(1);
            let kickers = (singles.next(), singles.next(), singles.next());
            if let (Some(pair), (Some(k0), Some(k1), Some(k2))) = (pair, kickers) {
                return HandRank::OnePair { pair, kickers: [k0, k1, k2] };
            }
        }
        _ => {}
    }
    HandRank::HighCard { ranks: desc }
}

/// Effective high card of a straight over ascending ranks, if they form one.
/// The wheel (A-2-3-4-5) plays as five-high.
fn straight_high(asc: &[Rank; 5]) -> Option<Rank> {
    if asc.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }
    if asc[4].value() - asc[0].value() == 4 {
        return Some(asc[4]);
    }
    let wheel = [Rank::Two, Rank::Three, Rank::Four, Rank::Five];
    if asc[..4] == wheel && asc[4] == Rank::Ace {
        return Some(Rank::Five);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> HandRank {
        let cards = parse_cards(s).expect("valid cards");
        try_evaluate(&cards).expect("five cards")
    }

    #[test]
    fn wrong_card_count_is_an_error() {
        let cards = parse_cards("Ah Kh Qh Jh").unwrap();
        assert_eq!(try_evaluate(&cards), Err(EvalError::CardCount(4)));
        let cards = parse_cards("Ah Kh Qh Jh 10h 9h").unwrap();
        assert_eq!(try_evaluate(&cards), Err(EvalError::CardCount(6)));
    }

    #[test]
    fn every_category_is_recognised() {
        assert_eq!(eval("Ah Kh Qh Jh 10h"), HandRank::RoyalFlush);
        assert_eq!(eval("9s Ks Qs Js 10s"), HandRank::StraightFlush { high: Rank::King });
        assert_eq!(eval("8s 8h 8d 8c 4s"), HandRank::FourOfAKind { quad: Rank::Eight });
        assert_eq!(eval("3c 3d 3h Js Jc"), HandRank::FullHouse { trips: Rank::Three });
        assert_eq!(
            eval("Kh 10h 8h 6h 3h"),
            HandRank::Flush { ranks: [Rank::King, Rank::Ten, Rank::Eight, Rank::Six, Rank::Three] }
        );
        assert_eq!(eval("9c 8d 7h 6s 5c"), HandRank::Straight { high: Rank::Nine });
        assert_eq!(eval("Qc Qd Qh 10s 2c"), HandRank::ThreeOfAKind { trips: Rank::Queen });
        assert_eq!(
            eval("9c Jd 9h Js 2c"),
            HandRank::TwoPair { pairs: [Rank::Jack, Rank::Nine], kicker: Rank::Two }
        );
        assert_eq!(
            eval("Ah 9c Ad 10s 2d"),
            HandRank::OnePair { pair: Rank::Ace, kickers: [Rank::Ten, Rank::Nine, Rank::Two] }
        );
        assert_eq!(
            eval("Ah Kd 7s 5c 2d"),
            HandRank::HighCard {
                ranks: [Rank::Ace, Rank::King, Rank::Seven, Rank::Five, Rank::Two]
            }
        );
    }

    #[test]
    fn wheel_is_a_five_high_straight() {
        assert_eq!(eval("Ac 2d 3h 4s 5c"), HandRank::Straight { high: Rank::Five });
        assert_eq!(eval("Ac 2c 3c 4c 5c"), HandRank::StraightFlush { high: Rank::Five });
    }

    #[test]
    fn broadway_off_suit_is_a_straight_not_royal() {
        assert_eq!(eval("Ah Kd Qh Jh 10h"), HandRank::Straight { high: Rank::Ace });
    }

    #[test]
    fn category_ranks_follow_priority() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.rank() as usize, i + 1);
        }
        assert!(Category::RoyalFlush.cmp_strength(Category::HighCard).is_gt());
        assert!(Category::OnePair.cmp_strength(Category::TwoPair).is_lt());
    }
}
