use crate::agents::{AgentError, PlayerAgent, Turn};
use crate::betting::{Action, BettingOutcome, BettingRound, BettingState};
use crate::deck::{Deck, DeckError, DECK_SIZE};
use crate::evaluator::{Category, HandRank};
use crate::hand::{DiscardError, Hand, HandError, HAND_SIZE};
use crate::tiebreak::{resolve_ties, TiebreakError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fewest players a table seats.
pub const MIN_PLAYERS: usize = 2;
/// A round uses at most five dealt plus three drawn cards per seat, so six
/// players is what one deck can serve.
pub const MAX_PLAYERS: usize = 6;

/// Stage of a round, used to tag history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    FirstBet,
    Draw,
    SecondBet,
    Showdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Raise,
    Call,
    Fold,
    Discard,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Raise => "Raise",
            HistoryVerb::Call => "Call",
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Discard => "Discard",
            HistoryVerb::Win => "Win",
            HistoryVerb::Split => "Split",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub seat: usize,
    pub verb: HistoryVerb,
    /// Chips committed or won; cards thrown for `Discard`.
    pub amount: Option<u64>,
    pub phase: Phase,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("a table needs at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error("one deck serves at most 6 players, got {0}")]
    TooManyPlayers(usize),
    #[error("cannot allow more discards than cards in a hand: {0}")]
    MaxDiscards(usize),
    #[error("{players} players drawing up to {max_discards} cards would run the deck dry")]
    DeckTooSmall { players: usize, max_discards: usize },
}

/// Errors that abort a round. Invalid player decisions never end up here;
/// they go back to the agent instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
    #[error(transparent)]
    Tiebreak(#[from] TiebreakError),
    #[error("seat {0} has no hand")]
    MissingHand(usize),
    #[error("no players left for showdown")]
    NoContenders,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) purse: u64,
    pub(crate) hand: Option<Hand>,
    pub(crate) folded: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, purse: u64) -> Self {
        Self { name: name.into(), purse, hand: None, folded: false }
    }

    /// Returns the player's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the money the player has behind
    pub fn purse(&self) -> u64 {
        self.purse
    }

    /// Returns the player's current hand, if dealt
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    pub(crate) fn turn(&self, seat: usize, pot: u64) -> Option<Turn<'_>> {
        let hand = self.hand.as_ref()?;
        Some(Turn { seat, name: &self.name, purse: self.purse, hand, pot })
    }
}

/// Table settings.
///
/// ```
/// use draw_poker::game::TableConfig;
///
/// let config = TableConfig::default().with_seed(7).with_starting_purse(500);
/// assert_eq!(config.starting_purse, 500);
/// assert_eq!(config.max_discards, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub starting_purse: u64,
    pub max_discards: usize,
    /// Seed for deck shuffles; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn with_starting_purse(mut self, purse: u64) -> Self {
        self.starting_purse = purse;
        self
    }

    pub fn with_max_discards(mut self, max: usize) -> Self {
        self.max_discards = max;
        self
    }

    /// Set a deterministic seed for reproducible deals.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { starting_purse: 100, max_discards: 3, seed: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundOutcome {
    /// Everyone else folded; no hands were shown.
    Uncontested,
    Showdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct WinnerShare {
    pub seat: usize,
    pub name: String,
    pub share: u64,
}

/// End-of-round report for frontends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub winners: Vec<WinnerShare>,
    /// The winning category; `None` when nobody had to show.
    pub category: Option<Category>,
    pub pot: u64,
    /// Chips lost to integer division on a split pot.
    pub remainder: u64,
    pub history: Vec<HistoryEntry>,
}

/// Seats, purses and the dealer button; plays one round at a time.
#[derive(Debug)]
#[non_exhaustive]
pub struct Table {
    pub(crate) players: Vec<Player>,
    pub(crate) dealer: Option<usize>,
    pub(crate) config: TableConfig,
    rng: ChaCha8Rng,
    history: Vec<HistoryEntry>,
}

impl Table {
    pub fn new<I, S>(names: I, config: TableConfig) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<Player> =
            names.into_iter().map(|n| Player::new(n, config.starting_purse)).collect();
        if players.len() < MIN_PLAYERS {
            return Err(TableError::TooFewPlayers(players.len()));
        }
        if players.len() > MAX_PLAYERS {
            return Err(TableError::TooManyPlayers(players.len()));
        }
        if config.max_discards > HAND_SIZE {
            return Err(TableError::MaxDiscards(config.max_discards));
        }
        if players.len() * (HAND_SIZE + config.max_discards) > DECK_SIZE {
            return Err(TableError::DeckTooSmall {
                players: players.len(),
                max_discards: config.max_discards,
            });
        }
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            players,
            dealer: None,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            history: Vec::new(),
        })
    }

    /// Returns a reference to the players in seating order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the dealer seat of the current or last round
    pub fn dealer(&self) -> Option<usize> {
        self.dealer
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Play one round with a freshly shuffled deck.
    pub fn play_round(&mut self, agent: &mut dyn PlayerAgent) -> Result<RoundSummary, RoundError> {
        let deck = Deck::shuffled(&mut self.rng);
        self.play_round_with_deck(deck, agent)
    }

    /// Play one round dealing from `deck` as given.
    ///
    /// Rotate the button, deal, bet, draw, bet again, then show down and
    /// pay out. The round ends early whenever all but one player fold.
    /// On error every bet of the round goes back to its owner.
    pub fn play_round_with_deck(
        &mut self,
        mut deck: Deck,
        agent: &mut dyn PlayerAgent,
    ) -> Result<RoundSummary, RoundError> {
        let dealer = self.rotate_dealer();
        log::info!("new round: dealer {} ({} players)", self.players[dealer].name, self.players.len());
        self.history.clear();
        for p in &mut self.players {
            p.folded = false;
            p.hand = None;
        }
        let purses: Vec<u64> = self.players.iter().map(|p| p.purse).collect();
        let played = self.run_round(&mut deck, dealer, agent);
        if let Err(e) = &played {
            log::warn!("round aborted, refunding bets: {e}");
            for (p, purse) in self.players.iter_mut().zip(purses) {
                p.purse = purse;
            }
        }
        played
    }

    fn run_round(
        &mut self,
        deck: &mut Deck,
        dealer: usize,
        agent: &mut dyn PlayerAgent,
    ) -> Result<RoundSummary, RoundError> {
        let mut pot = 0u64;

        self.deal(deck, dealer)?;

        if let Some(winner) = self.run_betting(agent, &mut pot, Phase::FirstBet)? {
            return Ok(self.settle(agent, RoundOutcome::Uncontested, vec![winner], None, pot));
        }
        self.draw(agent, deck, pot)?;
        if let Some(winner) = self.run_betting(agent, &mut pot, Phase::SecondBet)? {
            return Ok(self.settle(agent, RoundOutcome::Uncontested, vec![winner], None, pot));
        }

        let (winners, category) = self.showdown()?;
        Ok(self.settle(agent, RoundOutcome::Showdown, winners, Some(category), pot))
    }

    fn rotate_dealer(&mut self) -> usize {
        let n = self.players.len();
        let dealer = match self.dealer {
            Some(d) => (d + 1) % n,
            None => n - 1,
        };
        self.dealer = Some(dealer);
        dealer
    }

    /// Seats in turn order: everyone after the dealer, dealer last.
    fn seats_from(&self, dealer: usize) -> impl Iterator<Item = usize> {
        let n = self.players.len();
        (1..=n).map(move |step| (dealer + step) % n)
    }

    fn deal(&mut self, deck: &mut Deck, dealer: usize) -> Result<(), RoundError> {
        let order: Vec<usize> = self.seats_from(dealer).collect();
        for seat in order {
            let hand = Hand::try_new(deck.deal(HAND_SIZE)?)?;
            self.players[seat].hand = Some(hand);
        }
        Ok(())
    }

    /// Drive one betting pass; `Some(seat)` when everyone else folded.
    fn run_betting(
        &mut self,
        agent: &mut dyn PlayerAgent,
        pot: &mut u64,
        phase: Phase,
    ) -> Result<Option<usize>, RoundError> {
        let dealer = self.dealer.unwrap_or(0);
        let mut round = BettingRound::new(&mut self.players, pot, dealer);
        loop {
            let (seat, minimum_bet) = match round.state() {
                BettingState::AwaitingAction { seat, minimum_bet } => (seat, minimum_bet),
                BettingState::Resolved(BettingOutcome::AllButOneFolded { winner }) => {
                    return Ok(Some(winner));
                }
                BettingState::Resolved(BettingOutcome::SettledAt { final_bet }) => {
                    log::debug!("{phase:?} settled at {final_bet}");
                    return Ok(None);
                }
            };
            let action = {
                let turn = round.turn().ok_or(RoundError::MissingHand(seat))?;
                agent.collect_action(&turn, minimum_bet)?
            };
            match round.apply(action) {
                Ok(_) => {
                    let (verb, amount) = match action {
                        Action::Raise(extra) => (HistoryVerb::Raise, Some(extra + minimum_bet)),
                        Action::Call => (HistoryVerb::Call, Some(minimum_bet)),
                        Action::Fold => (HistoryVerb::Fold, None),
                    };
                    self.history.push(HistoryEntry { seat, verb, amount, phase });
                }
                Err(e) => {
                    log::debug!("seat {seat} action refused: {e}");
                    let turn = round.turn().ok_or(RoundError::MissingHand(seat))?;
                    agent.action_rejected(&turn, &e);
                }
            }
        }
    }

    fn draw(
        &mut self,
        agent: &mut dyn PlayerAgent,
        deck: &mut Deck,
        pot: u64,
    ) -> Result<(), RoundError> {
        let max = self.config.max_discards;
        let order: Vec<usize> = self.seats_from(self.dealer.unwrap_or(0)).collect();
        for seat in order {
            if self.players[seat].folded {
                continue;
            }
            loop {
                let indices = {
                    let turn =
                        self.players[seat].turn(seat, pot).ok_or(RoundError::MissingHand(seat))?;
                    agent.collect_discards(&turn, max)?
                };
                let hand =
                    self.players[seat].hand.as_mut().ok_or(RoundError::MissingHand(seat))?;
                match hand.exchange(&indices, max, deck) {
                    Ok(discarded) => {
                        log::debug!("seat {seat} drew {}", discarded.len());
                        self.history.push(HistoryEntry {
                            seat,
                            verb: HistoryVerb::Discard,
                            amount: Some(discarded.len() as u64),
                            phase: Phase::Draw,
                        });
                        break;
                    }
                    Err(DiscardError::Deck(e)) => return Err(e.into()),
                    Err(e) => {
                        log::debug!("seat {seat} discard refused: {e}");
                        let turn = self.players[seat]
                            .turn(seat, pot)
                            .ok_or(RoundError::MissingHand(seat))?;
                        agent.discard_rejected(&turn, &e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Best category wins; hands tied on category go to the tiebreaker.
    fn showdown(&self) -> Result<(Vec<usize>, Category), RoundError> {
        let contenders: Vec<(usize, HandRank)> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.folded)
            .map(|(i, p)| {
                p.hand.as_ref().map(|h| (i, h.evaluation())).ok_or(RoundError::MissingHand(i))
            })
            .collect::<Result<_, _>>()?;
        for (seat, rank) in &contenders {
            log::info!("showdown: {} shows {}", self.players[*seat].name, rank);
        }
        let best = contenders
            .iter()
            .map(|(_, h)| h.category())
            .min_by_key(|c| c.rank())
            .ok_or(RoundError::NoContenders)?;
        let tied: Vec<(usize, HandRank)> =
            contenders.into_iter().filter(|(_, h)| h.category() == best).collect();
        let winners = resolve_ties(tied, |(_, h)| *h)?;
        Ok((winners.into_iter().map(|(seat, _)| seat).collect(), best))
    }

    /// Split the pot evenly across `winners`. The odd chips are not paid out.
    fn settle(
        &mut self,
        agent: &mut dyn PlayerAgent,
        outcome: RoundOutcome,
        winners: Vec<usize>,
        category: Option<Category>,
        pot: u64,
    ) -> RoundSummary {
        let n = winners.len().max(1) as u64;
        let share = pot / n;
        let remainder = pot % n;
        let verb = if winners.len() > 1 { HistoryVerb::Split } else { HistoryVerb::Win };
        let phase = match outcome {
            RoundOutcome::Showdown => Phase::Showdown,
            RoundOutcome::Uncontested => self.history.last().map_or(Phase::FirstBet, |h| h.phase),
        };
        let mut shares = Vec::with_capacity(winners.len());
        for seat in winners {
            let player = &mut self.players[seat];
            player.purse += share;
            log::info!("{} {} {share}", player.name, verb.label().to_lowercase());
            self.history.push(HistoryEntry { seat, verb, amount: Some(share), phase });
            shares.push(WinnerShare { seat, name: player.name.clone(), share });
        }
        if remainder > 0 {
            log::info!("{remainder} left undistributed after split");
        }
        let summary = RoundSummary {
            outcome,
            winners: shares,
            category,
            pot,
            remainder,
            history: self.history.clone(),
        };
        agent.round_finished(&summary);
        summary
    }
}
