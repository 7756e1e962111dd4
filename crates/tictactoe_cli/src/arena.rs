//! Computer-versus-computer matches for the `arena` command.

use serde::Serialize;
use tictactoe_engine::{
    Board, Difficulty, EngineError, Outcome, Player, RandomSource, choose_computer_move, evaluate,
};
use tracing::{debug, info, instrument};

/// Tally of an arena run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArenaReport {
    /// Difficulty playing X.
    pub x: Difficulty,
    /// Difficulty playing O.
    pub o: Difficulty,
    /// Games played.
    pub games: u32,
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Drawn games.
    pub draws: u32,
}

impl ArenaReport {
    fn new(x: Difficulty, o: Difficulty) -> Self {
        Self {
            x,
            o,
            games: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::Winner(Player::X) => self.x_wins += 1,
            Outcome::Winner(Player::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Renders the tally for the terminal.
    pub fn render(&self) -> String {
        format!(
            "X ({}) vs O ({}) over {} games\n  X wins: {}\n  O wins: {}\n  Draws:  {}",
            self.x, self.o, self.games, self.x_wins, self.o_wins, self.draws
        )
    }
}

/// Plays one game between two computer players sharing `rng`.
///
/// # Errors
///
/// Propagates engine errors, which only occur if move selection breaks its
/// contract.
pub fn play_game<R: RandomSource>(
    x: Difficulty,
    o: Difficulty,
    rng: &mut R,
) -> Result<Outcome, EngineError> {
    let mut board = Board::new();
    let mut to_move = Player::X;
    loop {
        if let Some(outcome) = evaluate(&board) {
            return Ok(outcome);
        }
        let difficulty = match to_move {
            Player::X => x,
            Player::O => o,
        };
        let index = choose_computer_move(board, to_move, difficulty, &mut *rng)?;
        board = board.apply_move(index, to_move)?;
        to_move = to_move.opponent();
    }
}

/// Plays `games` games of `x` against `o`.
///
/// # Errors
///
/// Stops at the first engine error.
#[instrument(skip(rng))]
pub fn run_arena<R: RandomSource>(
    x: Difficulty,
    o: Difficulty,
    games: u32,
    rng: &mut R,
) -> Result<ArenaReport, EngineError> {
    let mut report = ArenaReport::new(x, o);
    for game in 0..games {
        let outcome = play_game(x, o, rng)?;
        debug!(game, %outcome, "Arena game finished");
        report.record(outcome);
    }
    info!(
        x_wins = report.x_wins,
        o_wins = report.o_wins,
        draws = report.draws,
        "Arena finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_engine::{RngSource, ScriptedSource};

    #[test]
    fn test_hard_mirror_always_draws() {
        let mut rng = RngSource::seeded(3);
        let report = run_arena(Difficulty::Hard, Difficulty::Hard, 9, &mut rng).unwrap();
        assert_eq!(report.draws, 9);
        assert_eq!(report.x_wins + report.o_wins, 0);
    }

    #[test]
    fn test_hard_never_loses_to_easy() {
        let mut rng = RngSource::seeded(11);
        let report = run_arena(Difficulty::Hard, Difficulty::Easy, 20, &mut rng).unwrap();
        assert_eq!(report.o_wins, 0);

        let report = run_arena(Difficulty::Easy, Difficulty::Hard, 20, &mut rng).unwrap();
        assert_eq!(report.x_wins, 0);
    }

    #[test]
    fn test_counts_add_up() {
        let mut rng = RngSource::seeded(5);
        let report = run_arena(Difficulty::Medium, Difficulty::Easy, 25, &mut rng).unwrap();
        assert_eq!(report.games, 25);
        assert_eq!(report.x_wins + report.o_wins + report.draws, 25);
    }

    #[test]
    fn test_scripted_easy_game() {
        // X takes 0, 1, 2 while O takes 3, 4.
        let mut rng = ScriptedSource::new([0, 3, 1, 4, 2], []);
        let outcome = play_game(Difficulty::Easy, Difficulty::Easy, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Winner(Player::X));
    }

    #[test]
    fn test_zero_games() {
        let mut rng = ScriptedSource::default();
        let report = run_arena(Difficulty::Easy, Difficulty::Easy, 0, &mut rng).unwrap();
        assert_eq!(report.games, 0);
        assert!(report.render().contains("over 0 games"));
    }
}
