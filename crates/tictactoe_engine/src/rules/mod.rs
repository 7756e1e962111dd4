//! Game rules for tic-tac-toe.
//!
//! Pure functions over a board snapshot. Nothing here keeps state, so the
//! same board always evaluates to the same result.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};

use crate::{Board, Outcome};
use tracing::instrument;

/// Resolves the board into an outcome.
///
/// A completed line wins; otherwise a full board is a draw; otherwise the
/// game is still going and `None` is returned.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(winner) = check_winner(board) {
        Some(Outcome::Winner(winner))
    } else if is_full(board) {
        Some(Outcome::Draw)
    } else {
        None
    }
}
