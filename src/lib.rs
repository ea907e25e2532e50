// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_settings, Settings};
use crate::engine::spawn_pipeline;
use crate::errors::Result;
use crate::exec::ShellCommandRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{IgnorePolicy, Scanner, Snapshot};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings resolution (CLI flags over config file over defaults)
/// - the ignore policy
/// - scanner / tracker / dispatcher / action runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let ignore = Arc::new(IgnorePolicy::new(settings.root(), settings.ignore())?);

    if args.dry_run {
        let snapshot = Scanner::new(Arc::clone(&fs), settings.root(), ignore.clone()).scan();
        print_dry_run(&settings, &ignore, &snapshot);
        return Ok(());
    }

    let pipeline = spawn_pipeline(&settings, fs, ignore, ShellCommandRunner::new());

    // There is no graceful drain: the pipeline runs until we are told to stop.
    tokio::signal::ctrl_c().await?;
    info!("interrupt received; shutting down");
    pipeline.abort();

    Ok(())
}

/// Simple dry-run output: print resolved settings and what a crawl sees.
fn print_dry_run(settings: &Settings, ignore: &IgnorePolicy, snapshot: &Snapshot) {
    println!("pollen dry-run");
    println!("  dir = {:?}", settings.root());
    if !ignore.entries().is_empty() {
        println!("  ignore = {:?}", ignore.entries());
    }
    println!("  build = {}", settings.build_cmd());
    println!("  restart = {}", settings.restart_cmd());
    println!("  scan_interval = {:?}", settings.scan_interval());
    println!("  recheck_interval = {:?}", settings.recheck_interval());
    println!("  timeout = {:?}", settings.timeout());
    println!();
    println!(
        "crawl: {} files, {} dirs",
        snapshot.files().len(),
        snapshot.dirs().len()
    );

    debug!(files = ?snapshot.files(), "dry-run crawl result");
}
