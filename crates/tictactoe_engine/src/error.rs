//! Engine error types.
//!
//! Both kinds are contract violations by the caller: they mean a move or a
//! search was requested without first checking [`Board::empty_squares`]
//! or the game phase.
//!
//! [`Board::empty_squares`]: crate::Board::empty_squares

/// Why a move could not be placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index is outside 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The square at the index is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),
}

impl std::error::Error for MoveError {}

/// Error raised by the board model and the minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// A move targeted an invalid square.
    #[display("Invalid move: {}", _0)]
    InvalidMove(MoveError),

    /// A search or random pick was requested on a board with no legal moves.
    #[display("Board has no legal moves to search")]
    Unsearchable,
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::InvalidMove(e) => Some(e),
            EngineError::Unsearchable => None,
        }
    }
}

impl From<MoveError> for EngineError {
    fn from(err: MoveError) -> Self {
        EngineError::InvalidMove(err)
    }
}
