// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollen`.
///
/// Every option except `--config`, `--log-level`, `--debug` and `--dry-run`
/// may also come from the config file; a flag given here always wins.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pollen",
    version,
    about = "Poll a directory tree and rebuild + restart on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch.
    ///
    /// Default: `.` (or `[watch].dir` from the config file).
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Comma-separated list of locations to ignore (relative to `--dir`).
    ///
    /// May be given more than once. Entries with glob characters
    /// (`*`, `?`, `[`, `{`) are matched as patterns.
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Build command, run through the shell.
    #[arg(long = "build-cmd", value_name = "CMD")]
    pub build_cmd: Option<String>,

    /// Restart command, run through the shell after a successful build.
    #[arg(long = "restart-cmd", value_name = "CMD")]
    pub restart_cmd: Option<String>,

    /// Debug logging (same as `--log-level debug`).
    #[arg(long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `POLLEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// How often to rescan the directory tree (e.g. "6s", "500ms").
    #[arg(long, value_name = "DURATION")]
    pub scan_interval: Option<String>,

    /// How often to compare snapshots and file mtimes (e.g. "3s").
    #[arg(long, value_name = "DURATION")]
    pub recheck_interval: Option<String>,

    /// Timeout applied to the build and to the restart command (e.g. "20s").
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolve settings, scan once and print a summary; run no commands.
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
