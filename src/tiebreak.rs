//! Ordering between classified hands.
//!
//! [`compare_same_category`] decides between two hands that share a
//! category; the [`Ord`] impl on [`HandRank`] layers category strength on
//! top of it, and [`resolve_ties`] reduces a tied field to its winner set.

use crate::cards::Rank;
use crate::evaluator::{Category, HandRank};
use core::cmp::Ordering;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TiebreakError {
    #[error("cannot tiebreak a {left} against a {right}")]
    CategoryMismatch { left: Category, right: Category },
}

/// Compare hand `a` against hand `b` when both share a category.
/// `Greater` means `a` is the stronger hand.
///
/// ```
/// use draw_poker::cards::parse_cards;
/// use draw_poker::evaluator::try_evaluate;
/// use draw_poker::tiebreak::compare_same_category;
/// use std::cmp::Ordering;
///
/// let eights = try_evaluate(&parse_cards("8s 8h 8d 8c 4s").unwrap()).unwrap();
/// let nines = try_evaluate(&parse_cards("9s 9h 9d 9c 4s").unwrap()).unwrap();
/// assert_eq!(compare_same_category(&eights, &nines), Ok(Ordering::Less));
/// ```
pub fn compare_same_category(a: &HandRank, b: &HandRank) -> Result<Ordering, TiebreakError> {
    compare_keys(a, b).ok_or(TiebreakError::CategoryMismatch {
        left: a.category(),
        right: b.category(),
    })
}

fn compare_keys(a: &HandRank, b: &HandRank) -> Option<Ordering> {
    use HandRank::*;
    let ord = match (a, b) {
        (RoyalFlush, RoyalFlush) => Ordering::Equal,
        (StraightFlush { high: x }, StraightFlush { high: y })
        | (Straight { high: x }, Straight { high: y })
        | (FourOfAKind { quad: x }, FourOfAKind { quad: y })
        | (FullHouse { trips: x }, FullHouse { trips: y })
        | (ThreeOfAKind { trips: x }, ThreeOfAKind { trips: y }) => x.cmp(y),
        (Flush { ranks: x }, Flush { ranks: y }) | (HighCard { ranks: x }, HighCard { ranks: y }) => {
            lexicographic(x, y)
        }
        (TwoPair { pairs: xp, kicker: xk }, TwoPair { pairs: yp, kicker: yk }) => {
            lexicographic(xp, yp).then(xk.cmp(yk))
        }
        (OnePair { pair: xp, kickers: xk }, OnePair { pair: yp, kickers: yk }) => {
            xp.cmp(yp).then_with(|| lexicographic(xk, yk))
        }
        _ => return None,
    };
    Some(ord)
}

/// Position-by-position comparison of two descending rank lists; the first
/// differing position decides.
fn lexicographic(a: &[Rank], b: &[Rank]) -> Ordering {
    a.iter().zip(b).map(|(x, y)| x.cmp(y)).find(|o| o.is_ne()).unwrap_or(Ordering::Equal)
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category()
            .cmp_strength(other.category())
            .then_with(|| compare_keys(self, other).unwrap_or(Ordering::Equal))
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reduce candidates tied on category to the set of equally strongest hands.
///
/// Each candidate is compared against the first provisional winner: a
/// stronger one replaces the set, an equal one joins it, a weaker one is
/// dropped. Winners keep their input order.
pub fn resolve_ties<T, F>(tied: Vec<T>, hand_of: F) -> Result<Vec<T>, TiebreakError>
where
    F: Fn(&T) -> HandRank,
{
    let mut winners: Vec<T> = Vec::with_capacity(tied.len());
    for candidate in tied {
        let Some(best) = winners.first() else {
            winners.push(candidate);
            continue;
        };
        match compare_same_category(&hand_of(&candidate), &hand_of(best))? {
            Ordering::Greater => {
                winners.clear();
                winners.push(candidate);
            }
            Ordering::Equal => winners.push(candidate),
            Ordering::Less => {}
        }
    }
    Ok(winners)
}
