//! Game phases and outcomes.

use super::Player;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single game.
///
/// `NotStarted -> InProgress -> Over`, and back to `NotStarted` only through
/// a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
pub enum GamePhase {
    /// Waiting for the human to pick a marker.
    #[default]
    #[strum(to_string = "Not started")]
    NotStarted,
    /// Moves are being played.
    #[strum(to_string = "In progress")]
    InProgress,
    /// A player won or the board filled up.
    #[strum(to_string = "Over")]
    Over,
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the game.
    Winner(Player),
    /// Game ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }

    /// The announcement shown when the game ends.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Winner(Player::X) => "Player X wins!",
            Outcome::Winner(Player::O) => "Player O wins!",
            Outcome::Draw => "It's a draw",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Winner(Player::X).to_string(), "Player X wins!");
        assert_eq!(Outcome::Winner(Player::O).to_string(), "Player O wins!");
        assert_eq!(Outcome::Draw.to_string(), "It's a draw");
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(Outcome::Winner(Player::O).winner(), Some(Player::O));
        assert!(Outcome::Draw.is_draw());
        assert_eq!(Outcome::Draw.winner(), None);
    }
}
