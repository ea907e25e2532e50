// src/engine/dispatcher.rs

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// "Run the build/restart chain again." Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger;

/// What happened to a signalled trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The slot was empty and now holds this trigger.
    Queued,
    /// A trigger was already pending; this one merged into it.
    Coalesced,
    /// The action runner is gone.
    Closed,
}

/// Sending half of the trigger slot. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Trigger>,
}

/// Receiving half, owned by the action runner.
#[derive(Debug)]
pub struct TriggerReceiver {
    rx: mpsc::Receiver<Trigger>,
}

/// Create a connected dispatcher / receiver pair.
///
/// The slot holds at most one pending trigger, so however many times the
/// tracker fires while an action is running, at most one more action follows.
pub fn dispatcher() -> (Dispatcher, TriggerReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (Dispatcher { tx }, TriggerReceiver { rx })
}

impl Dispatcher {
    /// Non-blocking send.
    pub fn signal(&self) -> SignalOutcome {
        match self.tx.try_send(Trigger) {
            Ok(()) => {
                debug!("trigger queued");
                SignalOutcome::Queued
            }
            Err(TrySendError::Full(_)) => {
                debug!("trigger already pending; coalesced");
                SignalOutcome::Coalesced
            }
            Err(TrySendError::Closed(_)) => {
                warn!("action runner has stopped; dropping trigger");
                SignalOutcome::Closed
            }
        }
    }
}

impl TriggerReceiver {
    /// Wait for the next trigger. `None` once every [`Dispatcher`] is gone.
    pub async fn recv(&mut self) -> Option<Trigger> {
        self.rx.recv().await
    }
}
