// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `jobdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobdag",
    version,
    about = "Run a graph of dependent jobs with bounded parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Job file (TOML) describing the job graph.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Maximum number of jobs running at once.
    ///
    /// Overrides `[options].max_jobs`; defaults to the host's parallelism.
    #[arg(short = 'j', long, value_name = "N")]
    pub max_jobs: Option<usize>,

    /// Directory for per-slot output capture files.
    ///
    /// Used when the job file does not set `[options].output_directory`.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Print the job graph in Graphviz DOT format instead of running it.
    #[arg(long)]
    pub dot: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
