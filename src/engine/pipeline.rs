// src/engine/pipeline.rs

//! Wires scanner -> tracker -> dispatcher -> action runner.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Settings;
use crate::engine::dispatcher::dispatcher;
use crate::engine::runner::{ActionCommands, ActionRunner};
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::watch::{snapshot_channel, IgnorePredicate, Scanner, Tracker};

/// Join handles of the three pipeline activities.
///
/// Dropping the handle does not stop anything; call [`PipelineHandle::abort`].
#[derive(Debug)]
pub struct PipelineHandle {
    pub scanner: JoinHandle<()>,
    pub tracker: JoinHandle<()>,
    pub runner: JoinHandle<()>,
}

impl PipelineHandle {
    /// Stop all three activities. A command that is mid-flight is killed
    /// when its task is dropped.
    pub fn abort(&self) {
        self.scanner.abort();
        self.tracker.abort();
        self.runner.abort();
    }
}

/// Spawn the full pipeline for `settings`.
///
/// All cross-activity traffic is message passing. The scanner publishes its
/// latest snapshot into a watch channel, so it never waits on a recheck in
/// progress. Triggers flow from the tracker to the runner through the
/// single-slot dispatcher.
pub fn spawn_pipeline<R>(
    settings: &Settings,
    fs: Arc<dyn FileSystem>,
    ignore: Arc<dyn IgnorePredicate>,
    runner: R,
) -> PipelineHandle
where
    R: CommandRunner + 'static,
{
    let (trigger_tx, trigger_rx) = dispatcher();
    let (snapshot_tx, snapshot_rx) = snapshot_channel();

    let commands = ActionCommands {
        build: settings.build_cmd().to_string(),
        restart: settings.restart_cmd().to_string(),
        timeout: settings.timeout(),
    };
    let action_runner = ActionRunner::new(runner, commands);
    let runner = tokio::spawn(action_runner.run(trigger_rx));

    let tracker = Tracker::spawn(
        Arc::clone(&fs),
        snapshot_rx,
        settings.recheck_interval(),
        trigger_tx,
    );

    let scanner = Scanner::new(fs, settings.root(), ignore)
        .spawn(settings.scan_interval(), snapshot_tx);

    info!(
        root = ?settings.root(),
        scan_interval = ?settings.scan_interval(),
        recheck_interval = ?settings.recheck_interval(),
        timeout = ?settings.timeout(),
        "pipeline started"
    );

    PipelineHandle {
        scanner,
        tracker,
        runner,
    }
}
