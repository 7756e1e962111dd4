//! Tic-tac-toe decision engine.
//!
//! Everything needed to play a human against a computer opponent, without
//! any I/O:
//!
//! - **Board**: a `Copy` 3x3 grid with emptiness queries and move application
//! - **Rules**: win and draw detection over a board snapshot
//! - **Minimax**: exhaustive search returning the best move and its score
//! - **Difficulty**: easy / medium / hard move-selection policies
//! - **Game**: the turn state machine that ties them together
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{Difficulty, Game, GamePhase, Player, RngSource};
//!
//! let mut game = Game::new(Difficulty::Hard, RngSource::seeded(7));
//! game.choose_player(Player::X);
//! game.submit_human_move(4);
//!
//! let turn = game.pending_computer_turn().expect("computer plays O");
//! game.play_computer_turn(turn).expect("board has empty squares");
//! assert_eq!(game.phase(), GamePhase::InProgress);
//! assert_eq!(game.history().len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod error;
mod game;
mod phases;
mod position;
mod random;
mod types;

pub mod minimax;
pub mod rules;

pub use difficulty::{Difficulty, choose_computer_move, random_move};
pub use error::{EngineError, MoveError};
pub use game::{ComputerTurn, Game, Move, Rejection, Seats, Transition};
pub use minimax::{Scored, best_move};
pub use phases::{GamePhase, Outcome};
pub use position::Position;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use rules::evaluate;
pub use types::{BOARD_SIZE, Board, ParseBoardError, Player, Square};
