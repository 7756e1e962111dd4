//! Interactive play session.
//!
//! A [`Session`] owns the [`Game`] and is the only thing that mutates it.
//! Typed lines become [`Command`]s; the computer's delayed reply arrives
//! as a [`SessionEvent`] on a channel, so both kinds of input are handled
//! one at a time on the same task.

use crate::scheduler::{Scheduler, TaskHandle};
use anyhow::{Context, Result};
use std::time::Duration;
use tictactoe_engine::{
    ComputerTurn, Difficulty, Game, GamePhase, Player, Position, RandomSource, Transition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Messages delivered to the session from scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The pause before the computer's move is over.
    ComputerTurnDue(ComputerTurn),
}

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick a marker and start the game.
    Choose(Player),
    /// Change the difficulty before the game starts.
    SetDifficulty(Difficulty),
    /// Place the human's mark.
    Move(Position),
    /// Abandon the current game and start over.
    Restart,
    /// Show the board again.
    Board,
    /// Show the command list.
    Help,
    /// Leave the program.
    Quit,
}

impl Command {
    /// Parses one input line. Returns `None` for anything unrecognized.
    pub fn parse(line: &str) -> Option<Command> {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "x" => Some(Command::Choose(Player::X)),
            "o" => Some(Command::Choose(Player::O)),
            "restart" | "r" | "new" => Some(Command::Restart),
            "board" | "b" => Some(Command::Board),
            "help" | "h" | "?" => Some(Command::Help),
            "quit" | "q" | "exit" => Some(Command::Quit),
            other => other
                .parse::<Difficulty>()
                .map(Command::SetDifficulty)
                .ok()
                .or_else(|| Position::parse_input(other).map(Command::Move)),
        }
    }
}

/// Text to show after handling input, and whether to stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Lines to print, in order.
    pub lines: Vec<String>,
    /// True once the player asked to quit.
    pub quit: bool,
}

impl Reply {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

const HELP: &str = "Commands:
  x | o                  choose your marker (X moves first)
  easy | medium | hard   set difficulty before choosing a marker
  1-9 | top-left | ...  place your mark
  board                  show the board
  restart                start over
  quit                   leave";

/// One player's session against the computer.
pub struct Session<R> {
    game: Game<R>,
    scheduler: Scheduler,
    pending: Option<(TaskHandle, ComputerTurn)>,
    delay: Duration,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<R: RandomSource> Session<R> {
    /// Creates a session and the receiver its scheduled events arrive on.
    pub fn new(game: Game<R>, delay: Duration) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            game,
            scheduler: Scheduler::new(),
            pending: None,
            delay,
            events,
        };
        (session, rx)
    }

    /// Read-only view of the game.
    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// True while a computer move is waiting to fire.
    pub fn computer_pending(&self) -> bool {
        self.pending.is_some() && self.scheduler.pending() > 0
    }

    /// Opening text for a fresh session.
    pub fn greeting(&self) -> Reply {
        let mut reply = Reply::default();
        reply.push(format!("Tic-tac-toe, difficulty: {}", self.game.difficulty()));
        reply.push("Choose your player: x or o (type help for commands)");
        reply
    }

    /// Handles one line typed by the player.
    #[instrument(skip(self))]
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        match Command::parse(line) {
            Some(command) => self.handle_command(command),
            None => {
                let mut reply = Reply::default();
                reply.push(format!("Unrecognized input {:?}; type help for commands", line.trim()));
                reply
            }
        }
    }

    /// Applies a parsed command.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, command: Command) -> Reply {
        let mut reply = Reply::default();
        match command {
            Command::Choose(player) => {
                if self.game.choose_player(player) {
                    reply.push(format!(
                        "You are {}, the computer is {} ({})",
                        player,
                        player.opponent(),
                        self.game.difficulty()
                    ));
                    self.show_board(&mut reply);
                    if self.schedule_computer_turn() {
                        reply.push("Computer is thinking...");
                    }
                } else {
                    reply.push("A game is already under way; type restart to choose again");
                }
            }
            Command::SetDifficulty(difficulty) => {
                if self.game.choose_difficulty(difficulty) {
                    reply.push(format!("Difficulty set to {}", difficulty));
                } else {
                    reply.push("Difficulty can only change before the game starts");
                }
            }
            Command::Move(position) => match self.game.submit_human_move(position.to_index()) {
                Transition::Rejected(reason) => reply.push(format!("{}", reason)),
                transition => {
                    self.show_board(&mut reply);
                    self.after_transition(transition, &mut reply);
                }
            },
            Command::Restart => {
                self.restart();
                reply.push("New game. Choose your player: x or o");
            }
            Command::Board => self.show_board(&mut reply),
            Command::Help => reply.push(HELP),
            Command::Quit => {
                self.cancel_pending();
                reply.quit = true;
            }
        }
        reply
    }

    /// Handles a scheduled event.
    ///
    /// # Errors
    ///
    /// Propagates engine errors from the computer's move selection.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<Reply> {
        let mut reply = Reply::default();
        match event {
            SessionEvent::ComputerTurnDue(turn) => {
                if self.pending.is_some_and(|(_, pending)| pending == turn) {
                    self.pending = None;
                }
                match self.game.play_computer_turn(turn)? {
                    Transition::Rejected(reason) => {
                        debug!(%reason, "Ignoring computer turn");
                    }
                    transition => {
                        if let Some(last) = self.game.history().last() {
                            let label = Position::from_index(last.index)
                                .map(|p| p.label())
                                .unwrap_or("?");
                            reply.push(format!("Computer plays {} ({})", last.index + 1, label));
                        }
                        self.show_board(&mut reply);
                        self.after_transition(transition, &mut reply);
                    }
                }
            }
        }
        Ok(reply)
    }

    /// Cancels any pending computer move and resets the game.
    pub fn restart(&mut self) {
        self.cancel_pending();
        self.game.restart();
    }

    fn after_transition(&mut self, transition: Transition, reply: &mut Reply) {
        match transition {
            Transition::Finished(outcome) => {
                info!(%outcome, "Session game finished");
                reply.push(outcome.message());
                reply.push("Type restart to play again");
            }
            Transition::Continued { .. } => {
                if self.schedule_computer_turn() {
                    reply.push("Computer is thinking...");
                } else {
                    reply.push("Your move");
                }
            }
            Transition::Rejected(_) => {}
        }
    }

    fn schedule_computer_turn(&mut self) -> bool {
        let Some(turn) = self.game.pending_computer_turn() else {
            return false;
        };
        self.cancel_pending();
        let events = self.events.clone();
        let handle = self.scheduler.schedule(self.delay, move || {
            // Receiver gone means the session is shutting down.
            let _ = events.send(SessionEvent::ComputerTurnDue(turn));
        });
        self.pending = Some((handle, turn));
        true
    }

    fn cancel_pending(&mut self) {
        if let Some((handle, _)) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn show_board(&self, reply: &mut Reply) {
        reply.push(self.game.board().display());
        if self.game.phase() == GamePhase::InProgress {
            reply.push(self.game.status());
        }
    }
}

/// Runs the session against stdin and stdout until quit or end of input.
///
/// When `preselect` is set the human's marker is chosen straight away.
/// Dropping the session on exit cancels a computer move still pending.
///
/// # Errors
///
/// Returns an error if reading stdin fails or the engine reports a broken
/// contract.
#[instrument(skip_all)]
pub async fn run<R: RandomSource>(
    mut session: Session<R>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    preselect: Option<Player>,
) -> Result<()> {
    print_reply(&session.greeting());
    if let Some(human) = preselect {
        print_reply(&session.handle_command(Command::Choose(human)));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    info!("Input closed");
                    break;
                };
                let reply = session.handle_line(&line);
                print_reply(&reply);
                if reply.quit {
                    break;
                }
            }
            Some(event) = events.recv() => {
                let reply = session.handle_event(event)?;
                print_reply(&reply);
            }
        }
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    for line in &reply.lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_engine::{Outcome, ScriptedSource};

    fn session(
        difficulty: Difficulty,
        rng: ScriptedSource,
    ) -> (Session<ScriptedSource>, mpsc::UnboundedReceiver<SessionEvent>) {
        Session::new(Game::new(difficulty, rng), Duration::from_millis(500))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(" X "), Some(Command::Choose(Player::X)));
        assert_eq!(Command::parse("o"), Some(Command::Choose(Player::O)));
        assert_eq!(Command::parse("HARD"), Some(Command::SetDifficulty(Difficulty::Hard)));
        assert_eq!(Command::parse("5"), Some(Command::Move(Position::Center)));
        assert_eq!(Command::parse("top-left"), Some(Command::Move(Position::TopLeft)));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("sideways"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_computer_replies_after_delay() {
        let (mut session, mut rx) = session(Difficulty::Easy, ScriptedSource::new([0], []));
        session.handle_line("x");

        let reply = session.handle_line("5");
        assert!(reply.lines.iter().any(|l| l == "Computer is thinking..."));
        assert!(session.computer_pending());

        let event = rx.recv().await.unwrap();
        let reply = session.handle_event(event).unwrap();

        assert_eq!(reply.lines[0], "Computer plays 1 (Top-left)");
        assert_eq!(session.game().history().len(), 2);
        assert!(!session.computer_pending());
        assert_eq!(session.game().to_move(), Some(Player::X));
    }

    #[tokio::test(start_paused = true)]
    async fn test_choosing_o_lets_computer_open() {
        let (mut session, mut rx) = session(Difficulty::Hard, ScriptedSource::new([8], []));
        let reply = session.handle_line("o");
        assert!(reply.lines.iter().any(|l| l == "Computer is thinking..."));

        let event = rx.recv().await.unwrap();
        session.handle_event(event).unwrap();
        assert_eq!(session.game().board().to_string(), "........X");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_move() {
        let (mut session, mut rx) = session(Difficulty::Easy, ScriptedSource::default());
        session.handle_line("o");
        assert!(session.computer_pending());

        session.handle_line("restart");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(session.game().phase(), GamePhase::NotStarted);
        assert!(session.game().board().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_event_is_ignored() {
        let (mut session, mut rx) = session(Difficulty::Easy, ScriptedSource::default());
        session.handle_line("o");
        let stale = rx.recv().await.unwrap();

        session.handle_line("restart");
        session.handle_line("o");
        let reply = session.handle_event(stale).unwrap();

        assert!(reply.lines.is_empty());
        assert!(session.game().board().is_empty());
        assert!(session.computer_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_turn_move_is_reported() {
        let (mut session, _rx) = session(Difficulty::Easy, ScriptedSource::default());
        session.handle_line("o");
        let reply = session.handle_line("5");
        assert_eq!(reply.lines, vec!["It's not O's turn".to_string()]);
        assert!(session.game().board().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_difficulty_locked_once_started() {
        let (mut session, _rx) = session(Difficulty::Easy, ScriptedSource::default());
        assert_eq!(session.handle_line("hard").lines, vec!["Difficulty set to hard".to_string()]);
        session.handle_line("x");
        assert_eq!(
            session.handle_line("easy").lines,
            vec!["Difficulty can only change before the game starts".to_string()]
        );
        assert_eq!(session.game().difficulty(), Difficulty::Hard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_message() {
        // Computer (O) wanders into 3 and 4 while X takes the top row.
        let (mut session, mut rx) = session(Difficulty::Easy, ScriptedSource::new([3, 4], []));
        session.handle_line("x");
        for square in ["1", "2"] {
            session.handle_line(square);
            let event = rx.recv().await.unwrap();
            session.handle_event(event).unwrap();
        }
        let reply = session.handle_line("3");

        assert!(reply.lines.iter().any(|l| l == "Player X wins!"));
        assert_eq!(session.game().outcome(), Some(Outcome::Winner(Player::X)));
        assert!(!session.computer_pending());
    }

    #[test]
    fn test_quit_sets_flag() {
        let (mut session, _rx) = session(Difficulty::Easy, ScriptedSource::default());
        assert!(session.handle_line("quit").quit);
        assert!(session.handle_line("   ").lines.is_empty());
    }
}
