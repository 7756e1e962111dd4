//! Command-line interface for tictactoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_engine::{Board, Difficulty, Player};

/// Tic-tac-toe against a minimax computer opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with easy, medium and hard computer players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $TICTACTOE_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        /// Computer difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Play as X or O without being asked
        #[arg(long)]
        human: Option<Player>,

        /// Pause before the computer moves, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Seed for reproducible computer play
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the perfect-play move for a position
    Analyze {
        /// Board as nine squares, row by row (X, O, or . for empty)
        board: Board,

        /// Marker the computer plays
        #[arg(long, default_value = "X")]
        computer: Player,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pit two computer players against each other
    Arena {
        /// Difficulty of the X player
        #[arg(long, default_value = "hard")]
        x: Difficulty,

        /// Difficulty of the O player
        #[arg(long, default_value = "easy")]
        o: Difficulty,

        /// Number of games to play
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
