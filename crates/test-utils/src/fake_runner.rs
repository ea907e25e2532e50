use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollen::exec::{CommandResult, CommandRunner};
use pollen::types::CommandOutcome;

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<String>>,
    scripted: Mutex<HashMap<String, VecDeque<CommandOutcome>>>,
    delay: Mutex<Duration>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

/// A fake command runner that:
/// - records every command it was asked to run, in order
/// - returns scripted outcomes per command (default: `Success`)
/// - optionally takes `delay` per command; if `delay >= timeout` it reports
///   `TimedOut` after `timeout`, like the real runner
/// - tracks the highest number of commands that were in flight at once.
#[derive(Clone, Default)]
pub struct FakeCommandRunner {
    inner: Arc<Inner>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock().unwrap() = delay;
        self
    }

    /// Queue outcomes for `command`; once exhausted, `Success` is returned.
    pub fn script(self, command: &str, outcomes: &[CommandOutcome]) -> Self {
        self.inner
            .scripted
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .extend(outcomes.iter().copied());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == command).count()
    }

    pub fn max_concurrency(&self) -> usize {
        self.inner.max_active.load(Ordering::SeqCst)
    }
}

fn next_outcome(inner: &Inner, command: &str) -> CommandOutcome {
    let mut scripted = inner.scripted.lock().unwrap();
    scripted
        .get_mut(command)
        .and_then(|q| q.pop_front())
        .unwrap_or(CommandOutcome::Success)
}

impl CommandRunner for FakeCommandRunner {
    fn run<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            inner.calls.lock().unwrap().push(command.to_string());
            let now_active = inner.active.fetch_add(1, Ordering::SeqCst) + 1;
            inner.max_active.fetch_max(now_active, Ordering::SeqCst);

            let delay = *inner.delay.lock().unwrap();
            let timed_out = !delay.is_zero() && delay >= timeout;
            tokio::time::sleep(if timed_out { timeout } else { delay }).await;

            let outcome = if timed_out {
                CommandOutcome::TimedOut
            } else {
                next_outcome(&inner, command)
            };

            inner.active.fetch_sub(1, Ordering::SeqCst);

            CommandResult {
                output: format!("ran: {command}\n").into_bytes(),
                outcome,
            }
        })
    }
}
