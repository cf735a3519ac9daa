// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `depflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "depflow",
    version,
    about = "Build a unit and everything it depends on, upstream first.",
    long_about = None
)]
pub struct CliArgs {
    /// Name of the root unit to build.
    #[arg(value_name = "UNIT")]
    pub job: String,

    /// Path to the config file (TOML).
    ///
    /// Default: `Depflow.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Depflow.toml")]
    pub config: String,

    /// Action to run for every unit in the plan in place of its configured
    /// `cmd`. The text is passed to the shell unchanged.
    #[arg(long, value_name = "ACTION")]
    pub job_action: Option<String>,

    /// Treat an unstable unit build as a failure.
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub fail_on_unstable: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEPFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the build plan, but don't trigger any builds.
    #[arg(long)]
    pub dry_run: bool,
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
