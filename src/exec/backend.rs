// src/exec/backend.rs

//! Pluggable command runner abstraction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::types::CommandOutcome;

/// Combined stdout/stderr of a command plus how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub output: Vec<u8>,
    pub outcome: CommandOutcome,
}

/// Trait abstracting how shell commands are executed.
///
/// Production code uses [`super::ShellCommandRunner`]; tests can provide their
/// own implementation that records invocations and scripts outcomes.
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the shell, giving up after `timeout`.
    ///
    /// Never fails as a call: every problem is folded into the returned
    /// [`CommandOutcome`].
    fn run<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn run<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        (**self).run(command, timeout)
    }
}
