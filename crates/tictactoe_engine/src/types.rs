//! Core domain types for tic-tac-toe.

use crate::error::{EngineError, MoveError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of squares on the board.
pub const BOARD_SIZE: usize = 9;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// Player X (always moves first).
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Single-character symbol used by [`Board::display`] and [`Board::from_str`].
    pub fn symbol(self) -> char {
        match self {
            Square::Empty => '.',
            Square::Occupied(Player::X) => 'X',
            Square::Occupied(Player::O) => 'O',
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are small `Copy` values. Every operation that places a mark
/// returns a new board, so callers can hand out snapshots freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; BOARD_SIZE],
        }
    }

    /// Builds a board from raw squares in row-major order.
    pub fn from_squares(squares: [Square; BOARD_SIZE]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; BOARD_SIZE] {
        &self.squares
    }

    /// Checks if the square at `pos` is in range and empty.
    pub fn is_open(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Indices of every empty square, in ascending order.
    pub fn empty_squares(&self) -> Vec<usize> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, sq)| **sq == Square::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|sq| **sq != Square::Empty).count()
    }

    /// True when no mark has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(|sq| *sq == Square::Empty)
    }

    /// Returns a copy of this board with `player` placed at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] if `pos` is outside 0-8 or the
    /// square is already occupied. `self` is left untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn apply_move(self, pos: usize, player: Player) -> Result<Board, EngineError> {
        match self.get(pos) {
            None => Err(MoveError::OutOfBounds(pos).into()),
            Some(Square::Occupied(_)) => Err(MoveError::SquareOccupied(pos).into()),
            Some(Square::Empty) => {
                let mut next = self;
                next.squares[pos] = Square::Occupied(player);
                Ok(next)
            }
        }
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based number so players can type it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    occupied => occupied.symbol().to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let compact: String = self.squares.iter().map(|sq| sq.symbol()).collect();
        write!(f, "{}", compact)
    }
}

/// Error returned when a board string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ParseBoardError {
    /// A character other than a mark, a blank or a separator.
    #[display("Unexpected character {:?} in board", _0)]
    UnexpectedChar(char),

    /// The string did not contain exactly nine squares.
    #[display("Expected 9 squares, found {}", _0)]
    WrongLength(usize),
}

impl std::error::Error for ParseBoardError {}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses nine squares of `X`, `O` and `.`/`_`/`-` (blank).
    ///
    /// Whitespace, `|` and `,` are ignored so both `"XX.OO...."` and
    /// `"X|X|. / O|O|. / .|.|."` style inputs work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::with_capacity(BOARD_SIZE);
        for c in s.chars() {
            let square = match c {
                'X' | 'x' => Square::Occupied(Player::X),
                'O' | 'o' => Square::Occupied(Player::O),
                '.' | '_' | '-' => Square::Empty,
                '|' | ',' | '/' => continue,
                c if c.is_whitespace() => continue,
                other => return Err(ParseBoardError::UnexpectedChar(other)),
            };
            squares.push(square);
        }

        let squares: [Square; BOARD_SIZE] = squares
            .try_into()
            .map_err(|v: Vec<Square>| ParseBoardError::WrongLength(v.len()))?;
        Ok(Board::from_squares(squares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.empty_squares(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_apply_move_returns_new_board() {
        let board = Board::new();
        let next = board.apply_move(4, Player::X).unwrap();

        assert!(board.is_empty());
        assert_eq!(next.get(4), Some(Square::Occupied(Player::X)));
        assert!(!next.is_empty());
    }

    #[test]
    fn test_apply_move_rejects_occupied() {
        let board = Board::new().apply_move(0, Player::X).unwrap();
        assert_eq!(
            board.apply_move(0, Player::O),
            Err(EngineError::InvalidMove(MoveError::SquareOccupied(0)))
        );
    }

    #[test]
    fn test_apply_move_rejects_out_of_bounds() {
        assert_eq!(
            Board::new().apply_move(9, Player::X),
            Err(EngineError::InvalidMove(MoveError::OutOfBounds(9)))
        );
    }

    #[test]
    fn test_empty_plus_occupied_is_nine() {
        let board: Board = "XO.X..O..".parse().unwrap();
        assert_eq!(board.empty_squares().len() + board.occupied_count(), 9);
        assert_eq!(board.empty_squares(), vec![2, 4, 5, 7, 8]);
    }

    #[test]
    fn test_display_shows_numbers_for_empty() {
        let board = Board::new().apply_move(4, Player::O).unwrap();
        assert_eq!(board.display(), "1|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_parse_ignores_separators() {
        let board: Board = "X|X|. / O|O|. / .|.|.".parse().unwrap();
        assert_eq!(board.to_string(), "XX.OO....");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("XX".parse::<Board>(), Err(ParseBoardError::WrongLength(2)));
        assert_eq!(
            "XXZ......".parse::<Board>(),
            Err(ParseBoardError::UnexpectedChar('Z'))
        );
    }

    #[test]
    fn test_player_parse_case_insensitive() {
        assert_eq!("x".parse::<Player>().unwrap(), Player::X);
        assert_eq!("O".parse::<Player>().unwrap(), Player::O);
        assert_eq!(Player::X.opponent(), Player::O);
    }
}
