//! Turn state machine for a human-versus-computer game.
//!
//! [`Game`] owns the authoritative board, the phase and the seat
//! assignment. Every state change happens in one of the transition methods
//! below; reads never recompute anything.
//!
//! The computer's move is two-step. After an accepted move hands the turn
//! to the computer, [`Game::pending_computer_turn`] yields a
//! [`ComputerTurn`] ticket. Whoever drives the game (usually after a short
//! pause) redeems it with [`Game::play_computer_turn`]. A restart
//! invalidates every outstanding ticket.

use crate::difficulty::{Difficulty, choose_computer_move};
use crate::error::EngineError;
use crate::phases::{GamePhase, Outcome};
use crate::random::RandomSource;
use crate::rules::evaluate;
use crate::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ─────────────────────────────────────────────────────────────
//  Value types
// ─────────────────────────────────────────────────────────────

/// Which marker each side plays, fixed from game start until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    /// Marker played by the human.
    pub human: Player,
    /// Marker played by the computer.
    pub computer: Player,
}

impl Seats {
    /// Seats the human as `human` and the computer as the other marker.
    pub fn for_human(human: Player) -> Self {
        Self {
            human,
            computer: human.opponent(),
        }
    }
}

/// An accepted move, as recorded in the game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player who placed the mark.
    pub player: Player,
    /// Board index (0-8) of the mark.
    pub index: usize,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.index + 1)
    }
}

/// Why a move request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// No game is in progress.
    #[display("No game in progress")]
    NotInProgress,

    /// The acting player is not the one to move.
    #[display("It's not {}'s turn", _0)]
    OutOfTurn(Player),

    /// The square is occupied or off the board.
    #[display("Square {} is not available", _0)]
    SquareUnavailable(usize),

    /// The computer-turn ticket belongs to an earlier turn or game.
    #[display("Computer turn is no longer current")]
    StaleTurn,
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request was a no-op.
    Rejected(Rejection),
    /// The move was applied and `next` is now to move.
    Continued {
        /// Player to move next.
        next: Player,
    },
    /// The move was applied and ended the game.
    Finished(Outcome),
}

impl Transition {
    /// True unless the request was rejected.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Transition::Rejected(_))
    }
}

/// Ticket for one pending computer move.
///
/// Only valid for the game epoch and ply it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputerTurn {
    epoch: u64,
    ply: usize,
}

// ─────────────────────────────────────────────────────────────
//  State machine
// ─────────────────────────────────────────────────────────────

/// A single human-versus-computer game.
#[derive(Debug, Clone)]
pub struct Game<R> {
    board: Board,
    phase: GamePhase,
    difficulty: Difficulty,
    seats: Option<Seats>,
    to_move: Option<Player>,
    outcome: Option<Outcome>,
    history: Vec<Move>,
    epoch: u64,
    rng: R,
}

impl<R: RandomSource> Game<R> {
    /// Creates a game waiting for the human to pick a marker.
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        Self {
            board: Board::new(),
            phase: GamePhase::NotStarted,
            difficulty,
            seats: None,
            to_move: None,
            outcome: None,
            history: Vec::new(),
            epoch: 0,
            rng,
        }
    }

    /// Sets the difficulty for the next game.
    ///
    /// Only accepted before the game starts; returns whether it was applied.
    #[instrument(skip(self))]
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::NotStarted {
            debug!(phase = %self.phase, "Difficulty is fixed once the game starts");
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// Seats the human as `human` and starts the game.
    ///
    /// X always moves first, whichever marker the human picked. Only
    /// accepted while not started; returns whether the game started.
    #[instrument(skip(self))]
    pub fn choose_player(&mut self, human: Player) -> bool {
        if self.phase != GamePhase::NotStarted {
            debug!(phase = %self.phase, "Players already chosen");
            return false;
        }
        let seats = Seats::for_human(human);
        self.seats = Some(seats);
        self.to_move = Some(Player::X);
        self.phase = GamePhase::InProgress;
        info!(
            human = %seats.human,
            computer = %seats.computer,
            difficulty = %self.difficulty,
            "Game started"
        );
        true
    }

    /// Plays `index` for the human.
    #[instrument(skip(self))]
    pub fn submit_human_move(&mut self, index: usize) -> Transition {
        match self.seats {
            Some(seats) => self.make_move(index, seats.human),
            None => self.reject(Rejection::NotInProgress),
        }
    }

    /// Places `acting`'s mark at `index` if the move is legal right now.
    ///
    /// Illegal requests (wrong phase, wrong turn, unavailable square) leave
    /// the game untouched and come back as [`Transition::Rejected`].
    #[instrument(skip(self))]
    pub fn make_move(&mut self, index: usize, acting: Player) -> Transition {
        if self.phase != GamePhase::InProgress {
            return self.reject(Rejection::NotInProgress);
        }
        if self.to_move != Some(acting) {
            return self.reject(Rejection::OutOfTurn(acting));
        }
        let board = match self.board.apply_move(index, acting) {
            Ok(board) => board,
            Err(_) => return self.reject(Rejection::SquareUnavailable(index)),
        };

        self.board = board;
        self.history.push(Move {
            player: acting,
            index,
        });

        if let Some(outcome) = evaluate(&self.board) {
            self.phase = GamePhase::Over;
            self.to_move = None;
            self.outcome = Some(outcome);
            info!(%outcome, moves = self.history.len(), "Game over");
            return Transition::Finished(outcome);
        }

        let next = acting.opponent();
        self.to_move = Some(next);
        debug!(player = %acting, index, %next, "Move applied");
        Transition::Continued { next }
    }

    /// Ticket for the computer's move, if it is the computer's turn.
    pub fn pending_computer_turn(&self) -> Option<ComputerTurn> {
        let seats = self.seats?;
        (self.phase == GamePhase::InProgress && self.to_move == Some(seats.computer)).then_some(
            ComputerTurn {
                epoch: self.epoch,
                ply: self.history.len(),
            },
        )
    }

    /// Lets the computer pick and play its move.
    ///
    /// The ticket must come from [`Game::pending_computer_turn`] for the
    /// current turn; anything older is ignored as
    /// [`Rejection::StaleTurn`]. The chosen square goes through
    /// [`Game::make_move`] like any human move.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from move selection. A valid ticket
    /// implies an undecided board, so this does not happen in practice.
    #[instrument(skip(self))]
    pub fn play_computer_turn(&mut self, turn: ComputerTurn) -> Result<Transition, EngineError> {
        if self.pending_computer_turn() != Some(turn) {
            return Ok(self.reject(Rejection::StaleTurn));
        }
        let Some(seats) = self.seats else {
            return Ok(self.reject(Rejection::NotInProgress));
        };

        let index = choose_computer_move(self.board, seats.computer, self.difficulty, &mut self.rng)?;
        Ok(self.make_move(index, seats.computer))
    }

    /// Clears the board and returns to [`GamePhase::NotStarted`].
    ///
    /// Difficulty is kept. Any outstanding [`ComputerTurn`] becomes stale.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.epoch += 1;
        self.board = Board::new();
        self.phase = GamePhase::NotStarted;
        self.seats = None;
        self.to_move = None;
        self.outcome = None;
        self.history.clear();
        info!(epoch = self.epoch, "Game restarted");
    }

    fn reject(&self, reason: Rejection) -> Transition {
        debug!(%reason, phase = %self.phase, "Move rejected");
        Transition::Rejected(reason)
    }
}

impl<R> Game<R> {
    /// Snapshot of the board.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Difficulty used for the computer's moves.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Seat assignment, once the game has started.
    pub fn seats(&self) -> Option<Seats> {
        self.seats
    }

    /// Player to move, while the game is in progress.
    pub fn to_move(&self) -> Option<Player> {
        self.to_move
    }

    /// How the game ended, once it is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Accepted moves in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// One-line status for display.
    pub fn status(&self) -> String {
        match (self.phase, self.to_move, self.outcome) {
            (GamePhase::NotStarted, _, _) => "Choose your player".to_string(),
            (GamePhase::InProgress, Some(player), _) => format!("Player {} to move", player),
            (GamePhase::Over, _, Some(outcome)) => outcome.message().to_string(),
            (phase, _, _) => phase.to_string(),
        }
    }
}
