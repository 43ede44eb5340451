//! CLI argument definitions for rally.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rally_core::{PlayerSlot, WinCondition};

#[derive(Parser)]
#[command(name = "rally")]
#[command(about = "Table-tennis match scorer", version)]
pub struct Args {
    /// Settings file (defaults to <config dir>/rally/config.toml)
    #[arg(long, short, value_name = "FILE", env = "RALLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score a match interactively from the keyboard
    Play {
        /// Win condition (single, bo3, bo5, bo7)
        #[arg(long, short)]
        win: Option<WinCondition>,
        /// Continue the match stored in the snapshot file
        #[arg(long)]
        resume: bool,
        /// Snapshot file to autosave to
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },
    /// Replay a script of inputs and print the result
    Replay {
        /// Script file with one or more tokens per line (a, b, undo, redo, next, reset)
        script: PathBuf,
        /// Win condition (single, bo3, bo5, bo7)
        #[arg(long, short)]
        win: Option<WinCondition>,
        /// Player serving first in the first set, and again after a `reset`
        #[arg(long, default_value = "a")]
        first_server: PlayerSlot,
        /// Output file path (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, short, value_enum, default_value = "tsv")]
        format: ExportFormat,
    },
    /// Compute the rating update for a finished match
    Rate {
        /// Rating of player A
        #[arg(long)]
        rating_a: i32,
        /// Rating of player B
        #[arg(long)]
        rating_b: i32,
        /// Winning player (a or b)
        #[arg(long)]
        winner: PlayerSlot,
        /// K-factor (defaults to the configured one)
        #[arg(long, short)]
        k: Option<f64>,
    },
    /// Check manually entered set scores, e.g. `11-9 9-11 11-7`
    Validate {
        /// Set scores as A-B
        #[arg(required = true)]
        sets: Vec<String>,
        /// Win condition (single, bo3, bo5, bo7)
        #[arg(long, short)]
        win: Option<WinCondition>,
    },
    /// Show a saved match snapshot
    Show {
        /// Snapshot file (defaults to the configured one)
        snapshot: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Tsv,
    Json,
}
