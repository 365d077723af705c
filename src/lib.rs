//! draw-poker: five-card draw poker engine
//!
//! Goals:
//! - Classify any five cards into one of ten categories and order hands
//! - Drive a full round: deal, bet, draw, bet, showdown, pay out
//! - No panics for invalid input; player mistakes come back as `Result` errors
//!
//! ## Quick start: compare two hands
//! ```
//! use draw_poker::hand::Hand;
//! use draw_poker::evaluator::Category;
//!
//! let eights: Hand = "8s 8h 8d 8c 4s".parse().unwrap();
//! let nines: Hand = "9s 9h 9d 9c 4d".parse().unwrap();
//! assert_eq!(eights.category(), Category::FourOfAKind);
//! assert!(nines.evaluation() > eights.evaluation());
//! ```
//!
//! ## Playing rounds
//! A [`game::Table`] runs rounds and asks an [`agents::PlayerAgent`] for
//! every decision. Run the hot-seat console game with:
//! ```sh
//! cargo run --bin draw-poker -- --player Alice --player Bob
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod deck;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod tiebreak;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
