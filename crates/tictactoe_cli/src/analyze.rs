//! One-shot position analysis for the `analyze` command.

use serde::Serialize;
use tictactoe_engine::{Board, EngineError, Player, Position, Scored, best_move, evaluate, minimax};
use tracing::{debug, instrument};

/// Result a perfect player can force from the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    /// Forced win.
    Win,
    /// Best play draws.
    Draw,
    /// Forced loss against perfect play.
    Loss,
}

/// The computer's best move for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Board in compact notation.
    pub board: String,
    /// Marker the analysis plays for.
    pub computer: Player,
    /// Chosen square, 0-based.
    pub index: usize,
    /// Human-readable name of the square.
    pub label: &'static str,
    /// Minimax score of the move.
    pub score: i32,
    /// What the score means.
    pub verdict: Verdict,
    /// Plies until the game is decided, for wins and losses.
    pub plies: Option<i32>,
}

/// Searches `board` for `computer`'s best move.
///
/// # Errors
///
/// Returns [`EngineError::Unsearchable`] when the game on `board` is already
/// decided.
#[instrument(fields(board = %board))]
pub fn analyze(board: Board, computer: Player) -> Result<Analysis, EngineError> {
    let Scored { score, index } = best_move(board, computer)?;
    let (verdict, plies) = match score {
        s if s > 0 => (Verdict::Win, Some(minimax::WIN_SCORE - s)),
        s if s < 0 => (Verdict::Loss, Some(minimax::WIN_SCORE + s)),
        _ => (Verdict::Draw, None),
    };
    let label = Position::from_index(index).map(|p| p.label()).unwrap_or("?");
    debug!(index, score, %verdict, "Analysis complete");

    Ok(Analysis {
        board: board.to_string(),
        computer,
        index,
        label,
        score,
        verdict,
        plies,
    })
}

/// Explains why a board cannot be analyzed.
pub fn describe_unsearchable(board: &Board) -> String {
    match evaluate(board) {
        Some(outcome) => format!("Nothing to analyze: {}", outcome.message()),
        None => "Nothing to analyze: no empty squares".to_string(),
    }
}

/// Renders an analysis for the terminal.
pub fn render(analysis: &Analysis, board: &Board) -> String {
    let outlook = match (analysis.verdict, analysis.plies) {
        (Verdict::Win, Some(plies)) => format!("wins in {} ply", plies),
        (Verdict::Loss, Some(plies)) => format!("loses in {} ply", plies),
        _ => "draws with best play".to_string(),
    };
    format!(
        "{}\n\nBest move for {}: {} ({})\nScore {}: {} {}",
        board.display(),
        analysis.computer,
        analysis.index + 1,
        analysis.label,
        analysis.score,
        analysis.computer,
        outlook
    )
}
