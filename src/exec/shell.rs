// src/exec/shell.rs

//! Shell command execution with a timeout.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::exec::backend::{CommandResult, CommandRunner};
use crate::types::CommandOutcome;

/// How long output pipes may stay open after the shell has exited. A command
/// that backgrounds a long-running child (`./app &`) leaves that child
/// holding the pipes; its output past this point is not collected.
const OUTPUT_GRACE: Duration = Duration::from_millis(250);

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        Box::pin(run_shell(command, timeout))
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Copy everything from `reader` into the shared `sink` until EOF.
async fn pump<R: AsyncRead + Unpin>(reader: Option<R>, sink: Arc<Mutex<Vec<u8>>>) {
    let Some(mut reader) = reader else {
        return;
    };
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]);
            }
            Err(err) => {
                debug!(error = %err, "stopped reading command output");
                break;
            }
        }
    }
}

/// Wait up to [`OUTPUT_GRACE`] for the pumps to hit EOF, then abandon the
/// ones still reading.
async fn drain(pumps: Vec<JoinHandle<()>>, command: &str) {
    let deadline = tokio::time::Instant::now() + OUTPUT_GRACE;
    for mut pump in pumps {
        if tokio::time::timeout_at(deadline, &mut pump).await.is_err() {
            pump.abort();
            debug!(cmd = %command, "output still open after exit; no longer collecting it");
        }
    }
}

/// Run `command` through the shell and wait for it, at most `timeout`.
///
/// The command is finished when the shell process exits; background
/// children it leaves behind do not keep it running. stdout and stderr are
/// interleaved into one buffer in the order the chunks arrive. On timeout the
/// child is killed and whatever output was produced so far is returned
/// alongside [`CommandOutcome::TimedOut`].
pub async fn run_shell(command: &str, timeout: Duration) -> CommandResult {
    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(cmd = %command, error = %err, "failed to spawn command");
            return CommandResult {
                output: format!("failed to spawn '{command}': {err}\n").into_bytes(),
                outcome: CommandOutcome::NonZeroExit(-1),
            };
        }
    };

    let combined = Arc::new(Mutex::new(Vec::new()));
    let pumps = vec![
        tokio::spawn(pump(child.stdout.take(), Arc::clone(&combined))),
        tokio::spawn(pump(child.stderr.take(), Arc::clone(&combined))),
    ];

    let outcome = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => CommandOutcome::Success,
        Ok(Ok(status)) => CommandOutcome::NonZeroExit(status.code().unwrap_or(-1)),
        Ok(Err(err)) => {
            warn!(cmd = %command, error = %err, "failed waiting for command");
            CommandOutcome::NonZeroExit(-1)
        }
        Err(_) => {
            if let Err(err) = child.kill().await {
                warn!(cmd = %command, error = %err, "failed to kill timed out command");
            }
            CommandOutcome::TimedOut
        }
    };

    drain(pumps, command).await;

    let output = std::mem::take(&mut *combined.lock().unwrap_or_else(PoisonError::into_inner));
    CommandResult { output, outcome }
}
