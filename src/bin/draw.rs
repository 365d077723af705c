use clap::Parser;
use crossterm::style::{Color, Stylize};
use draw_poker::agents::{AgentError, PlayerAgent, Turn};
use draw_poker::betting::{Action, ActionError};
use draw_poker::cards::{Card, SuitColor};
use draw_poker::game::{RoundOutcome, RoundSummary, Table, TableConfig};
use draw_poker::hand::{DiscardError, Hand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Hot-seat five-card draw at the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Player name; repeat once per seat.
    #[arg(long = "player", default_values = ["Alice", "Bob"])]
    players: Vec<String>,
    /// Money each player starts with.
    #[arg(long, default_value_t = 100)]
    purse: u64,
    /// Shuffle seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
}

fn styled(card: Card) -> String {
    let token = card.token();
    let fg = match token.color {
        SuitColor::Red => Color::Red,
        SuitColor::Black => Color::Black,
    };
    format!("{}{}", token.rank, token.suit).with(fg).on(Color::White).to_string()
}

fn show_hand(hand: &Hand) -> String {
    hand.cards().iter().map(|c| styled(*c)).collect::<Vec<_>>().join(" ")
}

/// Reads every seat's decisions from one terminal.
struct Console<R> {
    input: R,
}

impl<R: BufRead> Console<R> {
    fn prompt(&mut self, question: &str) -> Result<String, AgentError> {
        println!("{question}");
        io::stdout().flush().map_err(|e| AgentError::Unavailable(e.to_string()))?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Err(AgentError::Unavailable("input closed".into())),
            Ok(_) => Ok(line.trim().to_string()),
            Err(e) => Err(AgentError::Unavailable(e.to_string())),
        }
    }
}

impl<R: BufRead> PlayerAgent for Console<R> {
    fn collect_action(&mut self, turn: &Turn<'_>, minimum_bet: u64) -> Result<Action, AgentError> {
        println!("It's {}'s turn.", turn.name);
        println!("{}", show_hand(turn.hand));
        loop {
            println!("Current bet is {minimum_bet}. You have {} money.", turn.purse);
            let answer = self.prompt("Raise, call, or fold? (r,c,f)")?;
            let answer = if answer.eq_ignore_ascii_case("r") {
                format!("r {}", self.prompt("How much?")?)
            } else {
                answer
            };
            match answer.parse::<Action>() {
                Ok(action) => return Ok(action),
                Err(e) => println!("{e}"),
            }
        }
    }

    fn collect_discards(&mut self, turn: &Turn<'_>, max: usize) -> Result<Vec<usize>, AgentError> {
        println!("{}'s turn to discard.", turn.name);
        println!("{}", show_hand(turn.hand));
        loop {
            let answer = self.prompt(&format!("Which cards do you want to discard? (up to {max}, 1-5)"))?;
            let picks: Result<Vec<usize>, _> = answer
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<usize>())
                .collect();
            match picks {
                // positions are 1-based on screen; 0 wraps and is refused as out of range
                Ok(picks) => return Ok(picks.into_iter().map(|p| p.wrapping_sub(1)).collect()),
                Err(e) => println!("{e}"),
            }
        }
    }

    fn action_rejected(&mut self, _turn: &Turn<'_>, error: &ActionError) {
        println!("{error}");
    }

    fn discard_rejected(&mut self, _turn: &Turn<'_>, error: &DiscardError) {
        println!("{error}");
    }

    fn round_finished(&mut self, summary: &RoundSummary) {
        println!("{}", headline(summary));
        for w in &summary.winners {
            println!("  {} +{}", w.name, w.share);
        }
    }
}

fn headline(summary: &RoundSummary) -> String {
    let names: Vec<&str> = summary.winners.iter().map(|w| w.name.as_str()).collect();
    let verb = if names.len() == 1 { "wins" } else { "split the pot" };
    match (summary.outcome, summary.category) {
        (RoundOutcome::Showdown, Some(category)) => {
            format!("{} {verb} with {category}!!", names.join(", "))
        }
        _ => format!("{} takes the pot uncontested.", names.join(", ")),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = TableConfig::default().with_starting_purse(args.purse);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut table = match Table::new(args.players, config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Five card draw! (draw-poker {})", draw_poker::VERSION);

    let mut console = Console { input: io::stdin().lock() };
    loop {
        if let Err(e) = table.play_round(&mut console) {
            eprintln!("round aborted: {e}");
            return ExitCode::FAILURE;
        }
        for p in table.players() {
            println!("{}: {}", p.name(), p.purse());
        }
        match console.prompt("Another round? (y/n)") {
            Ok(answer) if answer.eq_ignore_ascii_case("n") => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_poker::agents::ScriptedAgent;
    use draw_poker::betting::Action::{Call, Fold, Raise};
    use draw_poker::cards::parse_cards;
    use draw_poker::deck::Deck;

    #[test]
    fn headline_agrees_with_the_winner_count() {
        let mut t = Table::new(["Ann", "Ben"], TableConfig::default().with_seed(1)).unwrap();
        let mut agent = ScriptedAgent::new([Raise(5), Fold], Vec::new());
        let summary = t.play_round(&mut agent).unwrap();
        assert_eq!(headline(&summary), "Ann takes the pot uncontested.");

        let deck = parse_cards("Ah Kh Qh Jh 10h As Ks Qs Js 10s").unwrap();
        let deck = Deck::stacked(deck).unwrap();
        let mut agent = ScriptedAgent::new([Call; 4], [vec![], vec![]]);
        let summary = t.play_round_with_deck(deck, &mut agent).unwrap();
        assert_eq!(headline(&summary), "Ann, Ben split the pot with Royal Flush!!");
    }
}
