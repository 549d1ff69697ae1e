// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `tunup`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tunup",
    version,
    about = "Keep a tunnel client running: probe, launch detached, verify startup.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the launcher config file (TOML).
    ///
    /// Default: `tunup.toml` in the user config directory; built-in defaults
    /// apply when no file exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TUNUP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the effective settings, but don't touch anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do; `up` when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Launch the tunnel client unless it is already running (default).
    Up,
    /// Report whether a matching tunnel client is running.
    Status,
    /// Stop the running tunnel client.
    Down,
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
