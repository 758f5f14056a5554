//! Command-line interface definitions.
//!
//! Running `botdeck` with no arguments starts the interactive console with
//! the telemetry sink in the background. The `sink` subcommand runs the sink
//! alone, for hosts without a terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Operator console for remote trading bots
#[derive(Parser, Debug)]
#[command(name = "botdeck")]
#[command(version, about)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Subcommand to run, defaulting to the interactive console.
    #[must_use]
    pub fn selected(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Console)
    }
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive bot console (default); also runs the telemetry sink
    Console,

    /// Run only the telemetry sink until interrupted
    Sink,
}
