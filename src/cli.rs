// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `backrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "backrun",
    version,
    about = "Define and run named file backup tasks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task store file (TOML).
    ///
    /// Default: `backrun-tasks.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BACKRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a new backup task.
    Add {
        /// Unique task name.
        name: String,
        /// Source directory.
        source: String,
        /// Destination directory.
        destination: String,
    },
    /// List the stored tasks.
    List,
    /// Delete the task at the given index.
    Delete { index: usize },
    /// Delete every task.
    Clear,
    /// Run all tasks sequentially, or a single one with `--index`.
    Run {
        /// Run only the task at this index.
        #[arg(long, value_name = "N")]
        index: Option<usize>,
    },
    /// Print the resolved task store path.
    StorePath,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
