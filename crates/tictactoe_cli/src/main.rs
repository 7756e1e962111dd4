//! Tictactoe - terminal front end
//!
//! Play against the computer, analyze positions, or run computer-versus-
//! computer matches.

#![warn(missing_docs)]

mod analyze;
mod arena;
mod cli;
mod config;
mod scheduler;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::{GameConfig, Overrides};
use session::Session;
use std::time::Duration;
use tictactoe_engine::{Board, Difficulty, EngineError, Game, Player, RandomSource, RngSource};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tictactoe=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Play {
            difficulty,
            human,
            delay_ms,
            seed,
        } => {
            let config = config.with_overrides(Overrides {
                difficulty,
                computer_delay_ms: delay_ms,
                seed,
                human,
            });
            run_play(config).await
        }
        Command::Analyze {
            board,
            computer,
            json,
        } => run_analyze(board, computer, json),
        Command::Arena {
            x,
            o,
            games,
            seed,
            json,
        } => run_arena(x, o, games, seed.or(*config.seed()), json),
    }
}

fn rng_for(seed: Option<u64>) -> impl RandomSource {
    seed.map(RngSource::seeded)
        .unwrap_or_else(RngSource::from_entropy)
}

/// Run an interactive game
#[instrument(skip_all)]
async fn run_play(config: GameConfig) -> Result<()> {
    info!(
        difficulty = %config.difficulty(),
        delay_ms = config.computer_delay_ms(),
        seeded = config.seed().is_some(),
        "Starting play session"
    );

    let game = Game::new(*config.difficulty(), rng_for(*config.seed()));
    let delay = Duration::from_millis(*config.computer_delay_ms());
    let (session, events) = Session::new(game, delay);
    session::run(session, events, *config.human()).await
}

/// Print the best move for a position
fn run_analyze(board: Board, computer: Player, json: bool) -> Result<()> {
    let analysis = match analyze::analyze(board, computer) {
        Ok(analysis) => analysis,
        Err(EngineError::Unsearchable) => anyhow::bail!(analyze::describe_unsearchable(&board)),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analyze::render(&analysis, &board));
    }
    Ok(())
}

/// Run computer-versus-computer games
fn run_arena(x: Difficulty, o: Difficulty, games: u32, seed: Option<u64>, json: bool) -> Result<()> {
    let mut rng = rng_for(seed);
    let report = arena::run_arena(x, o, games, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }
    Ok(())
}
