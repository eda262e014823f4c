// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::PackageManager;

/// Command-line arguments for `noderun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "noderun",
    version,
    about = "Run package-manager scripts with a chosen Node runtime.",
    long_about = None
)]
pub struct CliArgs {
    /// Script to run (a key of the project's `scripts` table).
    #[arg(value_name = "SCRIPT", required_unless_present = "list")]
    pub script: Option<String>,

    /// Project directory containing `package.json`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Package manager to invoke (npm, yarn, pnpm, cnpm).
    ///
    /// Default: the project's `packageManager` field, falling back to npm.
    #[arg(long, value_name = "NAME")]
    pub package_manager: Option<PackageManager>,

    /// Node installation to put first on the subprocess search path
    /// (a version directory, its `bin` directory, or the node executable).
    #[arg(long, value_name = "PATH")]
    pub runtime: Option<PathBuf>,

    /// Directory for per-run log files.
    #[arg(long, value_name = "DIR", default_value = ".noderun/logs")]
    pub log_root: PathBuf,

    /// List the project's scripts and exit.
    #[arg(long)]
    pub list: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NODERUN_LOG` or a default level will be used.
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
