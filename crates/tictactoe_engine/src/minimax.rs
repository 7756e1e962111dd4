//! Exhaustive minimax search.
//!
//! The 3x3 state space is small enough to search to the end without
//! pruning. Scores are from the computer's point of view: a win is worth
//! [`WIN_SCORE`] minus the plies it took, a loss the negation of that, and
//! a draw zero. Among equal outcomes this prefers the fastest win and the
//! slowest loss.

use crate::error::EngineError;
use crate::rules::evaluate;
use crate::{Board, Outcome, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Score of a win on the very next board.
pub const WIN_SCORE: i32 = 10;

/// A board index with its minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scored {
    /// Value of playing `index`, from the searching player's side.
    pub score: i32,
    /// Board index (0-8) of the move.
    pub index: usize,
}

/// Finds the best move for `computer`, who is to move on `board`.
///
/// Candidate moves are tried in ascending index order and ties keep the
/// first one found. The caller's board is never touched.
///
/// # Errors
///
/// Returns [`EngineError::Unsearchable`] if the board is already decided
/// (won or full), since there is no legal move to pick.
#[instrument(skip(board), fields(board = %board))]
pub fn best_move(board: Board, computer: Player) -> Result<Scored, EngineError> {
    if evaluate(&board).is_some() {
        return Err(EngineError::Unsearchable);
    }

    let mut best: Option<Scored> = None;
    for index in board.empty_squares() {
        let child = board.apply_move(index, computer)?;
        let score = value(child, computer, computer.opponent(), 1)?;
        if best.is_none_or(|b| score > b.score) {
            best = Some(Scored { score, index });
        }
    }

    let best = best.ok_or(EngineError::Unsearchable)?;
    debug!(index = best.index, score = best.score, "Minimax selected move");
    Ok(best)
}

/// Minimax value of `board` for `perspective` when `to_move` plays next.
///
/// Decided boards score immediately at depth zero. For any position,
/// `score(b, X, m) == -score(b, O, m)`.
#[instrument(level = "debug", skip(board), fields(board = %board))]
pub fn score(board: Board, perspective: Player, to_move: Player) -> Result<i32, EngineError> {
    value(board, perspective, to_move, 0)
}

fn value(board: Board, computer: Player, to_move: Player, depth: i32) -> Result<i32, EngineError> {
    if let Some(outcome) = evaluate(&board) {
        return Ok(terminal_score(outcome, computer, depth));
    }

    let maximizing = to_move == computer;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for index in board.empty_squares() {
        let child = board.apply_move(index, to_move)?;
        let score = value(child, computer, to_move.opponent(), depth + 1)?;
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    Ok(best)
}

fn terminal_score(outcome: Outcome, computer: Player, depth: i32) -> i32 {
    match outcome {
        Outcome::Winner(player) if player == computer => WIN_SCORE - depth,
        Outcome::Winner(_) => depth - WIN_SCORE,
        Outcome::Draw => 0,
    }
}
