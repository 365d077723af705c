use crate::cards::{parse_cards, Card};
use crate::deck::{Deck, DeckError};
use crate::evaluator::{evaluate_five, Category, HandRank};
use std::cell::OnceCell;
use std::collections::HashSet;
use std::str::FromStr;

/// Number of cards in a draw poker hand.
pub const HAND_SIZE: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("expected exactly 5 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate cards in hand")]
    DuplicateCards,
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// Rejected discard selections. The hand is left untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiscardError {
    #[error("discard at most {max} cards, got {got}")]
    TooMany { max: usize, got: usize },
    #[error("no card at position {0}")]
    OutOfRange(usize),
    #[error("position {0} selected twice")]
    Duplicate(usize),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Five cards held by one player.
///
/// The evaluation is computed on first use and cleared whenever the cards
/// change.
///
/// ```
/// use draw_poker::evaluator::Category;
/// use draw_poker::hand::Hand;
///
/// let hand: Hand = "8s 8h 8d 8c 4s".parse().unwrap();
/// assert_eq!(hand.category(), Category::FourOfAKind);
/// assert_eq!(hand.name(), "Four of a Kind");
/// ```
#[derive(Debug, Clone)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
    evaluation: OnceCell<HandRank>,
}

impl Hand {
    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let len = cards.len();
        let cards: [Card; HAND_SIZE] = cards.try_into().map_err(|_| HandError::CardCount(len))?;
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != HAND_SIZE {
            return Err(HandError::DuplicateCards);
        }
        Ok(Self { cards, evaluation: OnceCell::new() })
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn evaluation(&self) -> HandRank {
        *self.evaluation.get_or_init(|| evaluate_five(&self.cards))
    }

    pub fn category(&self) -> Category {
        self.evaluation().category()
    }

    pub fn name(&self) -> &'static str {
        self.category().name()
    }

    /// Check a discard selection without touching the hand.
    pub fn validate_discards(&self, indices: &[usize], max: usize) -> Result<(), DiscardError> {
        if indices.len() > max {
            return Err(DiscardError::TooMany { max, got: indices.len() });
        }
        let mut seen = [false; HAND_SIZE];
        for &i in indices {
            let slot = seen.get_mut(i).ok_or(DiscardError::OutOfRange(i))?;
            if *slot {
                return Err(DiscardError::Duplicate(i));
            }
            *slot = true;
        }
        Ok(())
    }

    /// Discard the cards at `indices` (0-based) and draw as many
    /// replacements from `deck`.
    ///
    /// Nothing changes unless the whole exchange can happen. Kept cards
    /// keep their order; replacements go at the end. The discarded cards are
    /// returned and never go back into the deck.
    pub fn exchange(
        &mut self,
        indices: &[usize],
        max: usize,
        deck: &mut Deck,
    ) -> Result<Vec<Card>, DiscardError> {
        self.validate_discards(indices, max)?;
        let replacements = deck.deal(indices.len())?;
        let mut kept = Vec::with_capacity(HAND_SIZE);
        let mut discarded = Vec::with_capacity(indices.len());
        for (i, card) in self.cards.iter().enumerate() {
            if indices.contains(&i) {
                discarded.push(*card);
            } else {
                kept.push(*card);
            }
        }
        kept.extend(replacements);
        for (slot, card) in self.cards.iter_mut().zip(kept) {
            *slot = card;
        }
        self.evaluation = OnceCell::new();
        Ok(discarded)
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Hand::try_new(cards)
    }
}
