//! One betting pass among the players still in the hand.
//!
//! Action starts at the seat after the dealer and moves around the table,
//! skipping folded seats. The pass closes once action comes back to a seat
//! that has already acted since the last raise, or as soon as a fold
//! leaves a single player.

use crate::agents::Turn;
use crate::game::Player;
use std::fmt;
use std::str::FromStr;

/// A betting decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    /// Put in the current bet plus `amount` more; the sum becomes the new bet.
    Raise(u64),
    /// Put in the current bet.
    Call,
    Fold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise(amount) => write!(f, "Raise {amount}"),
            Action::Call => f.write_str("Call"),
            Action::Fold => f.write_str("Fold"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("unrecognized action: '{0}'")]
    Unrecognized(String),
    #[error("betting is already closed")]
    Closed,
    #[error("a raise must add at least 1")]
    EmptyRaise,
    #[error("not enough money: need {need}, purse holds {purse}")]
    InsufficientFunds { need: u64, purse: u64 },
}

/// Parses `r <amount>` / `raise <amount>`, `c` / `call`, `f` / `fold`.
///
/// ```
/// use draw_poker::betting::Action;
///
/// assert_eq!("r 20".parse::<Action>().unwrap(), Action::Raise(20));
/// assert_eq!("C".parse::<Action>().unwrap(), Action::Call);
/// assert!("x".parse::<Action>().is_err());
/// ```
impl FromStr for Action {
    type Err = ActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut parts = lower.split_whitespace();
        let verb = parts.next();
        let arg = parts.next();
        let unrecognized = || ActionError::Unrecognized(s.trim().to_string());
        if parts.next().is_some() {
            return Err(unrecognized());
        }
        match (verb, arg) {
            (Some("c" | "call"), None) => Ok(Action::Call),
            (Some("f" | "fold"), None) => Ok(Action::Fold),
            (Some("r" | "raise"), Some(n)) => n.parse().map(Action::Raise).map_err(|_| unrecognized()),
            _ => Err(unrecognized()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BettingOutcome {
    /// Everybody else folded; `winner` takes the pot without a showdown.
    AllButOneFolded { winner: usize },
    /// The lap closed with this bet standing.
    SettledAt { final_bet: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BettingState {
    AwaitingAction { seat: usize, minimum_bet: u64 },
    Resolved(BettingOutcome),
}

/// A betting pass. Borrows the seated players and the pot until it resolves.
#[derive(Debug)]
pub struct BettingRound<'a> {
    players: &'a mut [Player],
    pot: &'a mut u64,
    current_bet: u64,
    last_raiser: usize,
    /// Per seat: acted since the last raise.
    acted: Vec<bool>,
    state: BettingState,
}

impl<'a> BettingRound<'a> {
    /// Open betting with the first unfolded seat after `dealer`.
    pub fn new(players: &'a mut [Player], pot: &'a mut u64, dealer: usize) -> Self {
        let acted = vec![false; players.len()];
        let mut round = Self {
            players,
            pot,
            current_bet: 0,
            last_raiser: 0,
            acted,
            state: BettingState::Resolved(BettingOutcome::SettledAt { final_bet: 0 }),
        };
        match round.sole_survivor() {
            Some(winner) => {
                round.state = BettingState::Resolved(BettingOutcome::AllButOneFolded { winner });
            }
            None => {
                if let Some(first) = round.next_unfolded(dealer) {
                    round.last_raiser = first;
                    round.state = BettingState::AwaitingAction { seat: first, minimum_bet: 0 };
                }
            }
        }
        round
    }

    pub fn state(&self) -> BettingState {
        self.state
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    /// The last seat to raise, or the opening seat if nobody has.
    pub fn last_raiser(&self) -> usize {
        self.last_raiser
    }

    pub fn pot(&self) -> u64 {
        *self.pot
    }

    /// The decision context for the seat to act, if any.
    pub fn turn(&self) -> Option<Turn<'_>> {
        match self.state {
            BettingState::AwaitingAction { seat, .. } => self.players[seat].turn(seat, *self.pot),
            BettingState::Resolved(_) => None,
        }
    }

    /// Apply the acting seat's decision. A refused action changes nothing.
    pub fn apply(&mut self, action: Action) -> Result<BettingState, ActionError> {
        let BettingState::AwaitingAction { seat, .. } = self.state else {
            return Err(ActionError::Closed);
        };
        match action {
            Action::Raise(0) => return Err(ActionError::EmptyRaise),
            Action::Raise(amount) => {
                let need = amount.saturating_add(self.current_bet);
                self.commit(seat, need)?;
                self.current_bet = need;
                self.last_raiser = seat;
                self.acted.fill(false);
            }
            Action::Call => self.commit(seat, self.current_bet)?,
            Action::Fold => self.players[seat].folded = true,
        }
        log::debug!("seat {seat} {action}, bet {} pot {}", self.current_bet, self.pot);
        self.acted[seat] = true;

        self.state = if let Some(winner) = self.sole_survivor() {
            BettingState::Resolved(BettingOutcome::AllButOneFolded { winner })
        } else {
            match self.next_unfolded(seat) {
                Some(next) if !self.acted[next] => {
                    BettingState::AwaitingAction { seat: next, minimum_bet: self.current_bet }
                }
                _ => BettingState::Resolved(BettingOutcome::SettledAt {
                    final_bet: self.current_bet,
                }),
            }
        };
        Ok(self.state)
    }

    fn commit(&mut self, seat: usize, need: u64) -> Result<(), ActionError> {
        let player = &mut self.players[seat];
        if need > player.purse {
            return Err(ActionError::InsufficientFunds { need, purse: player.purse });
        }
        player.purse -= need;
        *self.pot += need;
        Ok(())
    }

    fn sole_survivor(&self) -> Option<usize> {
        let mut unfolded = self.players.iter().enumerate().filter(|(_, p)| !p.folded);
        match (unfolded.next(), unfolded.next()) {
            (Some((seat, _)), None) => Some(seat),
            _ => None,
        }
    }

    fn next_unfolded(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|step| (from + step) % n).find(|&i| !self.players[i].folded)
    }
}
