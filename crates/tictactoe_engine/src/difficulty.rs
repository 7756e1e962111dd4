//! Difficulty tiers for the computer opponent.
//!
//! Every tier shares the same two primitives, a uniform random pick and
//! the minimax search. The tier only decides which one to use for a move.

use crate::error::EngineError;
use crate::minimax;
use crate::random::RandomSource;
use crate::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How close to optimal the computer plays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Every move is random.
    Easy,
    /// Roughly half the moves are optimal, the rest random.
    #[default]
    Medium,
    /// Optimal play after a random opening.
    Hard,
}

/// Picks the computer's next square according to `difficulty`.
///
/// On an empty board every tier plays a random opening. Medium flips a
/// coin only once the board has at least one mark.
///
/// # Errors
///
/// Returns [`EngineError::Unsearchable`] when the board has no legal moves.
#[instrument(skip(board, rng), fields(board = %board))]
pub fn choose_computer_move<R: RandomSource>(
    board: Board,
    computer: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<usize, EngineError> {
    let index = match difficulty {
        Difficulty::Easy => random_move(&board, rng)?,
        Difficulty::Medium => {
            if !board.is_empty() && rng.coin_flip() {
                minimax::best_move(board, computer)?.index
            } else {
                random_move(&board, rng)?
            }
        }
        Difficulty::Hard => {
            if board.is_empty() {
                random_move(&board, rng)?
            } else {
                minimax::best_move(board, computer)?.index
            }
        }
    };
    debug!(index, "Computer chose square");
    Ok(index)
}

/// Uniformly random empty square.
///
/// Draws indices from `rng` until one lands on an empty square.
///
/// # Errors
///
/// Returns [`EngineError::Unsearchable`] when the board is full.
pub fn random_move<R: RandomSource>(board: &Board, rng: &mut R) -> Result<usize, EngineError> {
    if board.empty_squares().is_empty() {
        return Err(EngineError::Unsearchable);
    }
    loop {
        let index = rng.next_index();
        if board.is_open(index) {
            return Ok(index);
        }
    }
}
