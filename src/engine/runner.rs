// src/engine/runner.rs

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::engine::dispatcher::TriggerReceiver;
use crate::errors::PollenError;
use crate::exec::{CommandResult, CommandRunner};
use crate::types::{CommandOutcome, Stage};

/// The two commands of one action cycle and the timeout applied to each.
#[derive(Debug, Clone)]
pub struct ActionCommands {
    pub build: String,
    pub restart: String,
    pub timeout: Duration,
}

/// Result of running one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub stage: Stage,
    pub output: Vec<u8>,
    pub outcome: CommandOutcome,
}

/// Result of one full action cycle.
///
/// `restart` is `None` when the build did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub build: StageResult,
    pub restart: Option<StageResult>,
}

impl CycleReport {
    /// The failure of this cycle, if any.
    pub fn failure(&self) -> Option<PollenError> {
        if !self.build.outcome.is_success() {
            return Some(PollenError::BuildFailure(self.build.outcome));
        }
        match &self.restart {
            Some(restart) if !restart.outcome.is_success() => {
                Some(PollenError::RestartFailure(restart.outcome))
            }
            _ => None,
        }
    }
}

/// Serially executes build, then restart, once per trigger.
pub struct ActionRunner<R: CommandRunner> {
    runner: R,
    commands: ActionCommands,
}

impl<R: CommandRunner> std::fmt::Debug for ActionRunner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRunner")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> ActionRunner<R> {
    pub fn new(runner: R, commands: ActionCommands) -> Self {
        Self { runner, commands }
    }

    /// Consume triggers one at a time until the dispatcher side is dropped.
    ///
    /// While a cycle runs, further triggers pile up in the single slot of the
    /// dispatcher and are served as one follow-up cycle.
    pub async fn run(self, mut triggers: TriggerReceiver) {
        info!("action runner started");

        while triggers.recv().await.is_some() {
            let report = self.run_cycle().await;
            if report.failure().is_none() {
                info!("build and restart finished");
            }
        }

        info!("trigger channel closed; action runner exiting");
    }

    /// Run build and, only if it succeeded, restart.
    pub async fn run_cycle(&self) -> CycleReport {
        let build = self.run_stage(Stage::Build, &self.commands.build).await;

        if !build.outcome.is_success() {
            let err = PollenError::BuildFailure(build.outcome);
            if build.outcome == CommandOutcome::TimedOut {
                error!(timeout = ?self.commands.timeout, "{err}; restart skipped");
            } else {
                error!("{err}; restart skipped");
            }
            return CycleReport {
                build,
                restart: None,
            };
        }

        let restart = self.run_stage(Stage::Restart, &self.commands.restart).await;
        if !restart.outcome.is_success() {
            let err = PollenError::RestartFailure(restart.outcome);
            if restart.outcome == CommandOutcome::TimedOut {
                error!(timeout = ?self.commands.timeout, "{err}");
            } else {
                warn!("{err}");
            }
        }

        CycleReport {
            build,
            restart: Some(restart),
        }
    }

    async fn run_stage(&self, stage: Stage, command: &str) -> StageResult {
        info!(%stage, cmd = %command, "{}...", stage.verb());

        let started = Instant::now();
        let CommandResult { output, outcome } =
            self.runner.run(command, self.commands.timeout).await;

        info!(
            %stage,
            %outcome,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{stage} finished"
        );

        surface_output(&output);

        StageResult {
            stage,
            output,
            outcome,
        }
    }
}

/// Command output goes to stdout; logs go to stderr.
fn surface_output(output: &[u8]) {
    if output.is_empty() {
        return;
    }
    let text = String::from_utf8_lossy(output);
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
