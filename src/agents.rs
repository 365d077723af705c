//! Agents: whoever supplies decisions for the seats at a table.
//!
//! The engine never reads input itself. When a seat must act or discard it
//! asks a [`PlayerAgent`]; when the answer breaks a rule the agent is told
//! why and asked again. Frontends (the console driver, tests, anything
//! else) implement this trait.

use crate::betting::{Action, ActionError};
use crate::game::RoundSummary;
use crate::hand::{DiscardError, Hand};
use std::collections::VecDeque;

/// What an agent gets to see when a seat is asked for a decision.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Turn<'a> {
    pub seat: usize,
    pub name: &'a str,
    pub purse: u64,
    pub hand: &'a Hand,
    pub pot: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error("no decision available for seat {0}")]
    Exhausted(usize),
    #[error("agent unavailable: {0}")]
    Unavailable(String),
}

/// A decision source for every seat at a table.
pub trait PlayerAgent {
    /// Pick a betting action. `minimum_bet` is what a call costs.
    fn collect_action(&mut self, turn: &Turn<'_>, minimum_bet: u64) -> Result<Action, AgentError>;

    /// Pick up to `max` distinct 0-based hand positions to discard.
    fn collect_discards(&mut self, turn: &Turn<'_>, max: usize) -> Result<Vec<usize>, AgentError>;

    /// The last action was refused; the same seat will be asked again.
    fn action_rejected(&mut self, _turn: &Turn<'_>, _error: &ActionError) {}

    /// The last discard selection was refused; the hand is unchanged.
    fn discard_rejected(&mut self, _turn: &Turn<'_>, _error: &DiscardError) {}

    /// Called once the pot has been paid out.
    fn round_finished(&mut self, _summary: &RoundSummary) {}
}

/// Plays back a fixed list of decisions in the order they are requested,
/// regardless of seat. Fails once a list runs dry.
#[derive(Debug, Default, Clone)]
pub struct ScriptedAgent {
    actions: VecDeque<Action>,
    discards: VecDeque<Vec<usize>>,
    rejections: usize,
}

impl ScriptedAgent {
    pub fn new<A, D>(actions: A, discards: D) -> Self
    where
        A: IntoIterator<Item = Action>,
        D: IntoIterator<Item = Vec<usize>>,
    {
        Self {
            actions: actions.into_iter().collect(),
            discards: discards.into_iter().collect(),
            rejections: 0,
        }
    }

    /// Number of refused actions and discard selections so far.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    /// Decisions not yet consumed.
    pub fn remaining(&self) -> (usize, usize) {
        (self.actions.len(), self.discards.len())
    }
}

impl PlayerAgent for ScriptedAgent {
    fn collect_action(&mut self, turn: &Turn<'_>, _minimum_bet: u64) -> Result<Action, AgentError> {
        self.actions.pop_front().ok_or(AgentError::Exhausted(turn.seat))
    }

    fn collect_discards(&mut self, turn: &Turn<'_>, _max: usize) -> Result<Vec<usize>, AgentError> {
        self.discards.pop_front().ok_or(AgentError::Exhausted(turn.seat))
    }

    fn action_rejected(&mut self, _turn: &Turn<'_>, _error: &ActionError) {
        self.rejections += 1;
    }

    fn discard_rejected(&mut self, _turn: &Turn<'_>, _error: &DiscardError) {
        self.rejections += 1;
    }
}
