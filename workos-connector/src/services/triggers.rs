//! Hand-off of accepted webhook deliveries to the workflow side.

use crate::models::TriggerEvent;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_TRIGGER_CAPACITY: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("Trigger queue is full")]
    Full,

    #[error("Trigger consumer has shut down")]
    Closed,
}

/// Sending half of the trigger queue. Cheap to clone.
#[derive(Clone, Debug)]
pub struct TriggerDispatcher {
    sender: mpsc::Sender<TriggerEvent>,
}

impl TriggerDispatcher {
    /// Create a bounded queue and return both ends.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TriggerEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue an event without waiting. A full or closed queue drops it.
    pub fn dispatch(&self, event: TriggerEvent) -> Result<(), TriggerError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TriggerError::Full,
            mpsc::error::TrySendError::Closed(_) => TriggerError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Drain the queue, logging every event, until all senders are dropped.
pub fn spawn_trigger_logger(mut receiver: mpsc::Receiver<TriggerEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            tracing::info!(
                event = event.event.as_deref().unwrap_or("unknown"),
                id = ?event.id,
                created_at = ?event.created_at,
                "WorkOS trigger fired"
            );
        }
        tracing::debug!("Trigger queue closed");
    })
}
