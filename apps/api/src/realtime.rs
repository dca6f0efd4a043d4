//! In-process change feed for `job_applications`.
//!
//! Mutations publish an `ApplicationEvent`; SSE subscribers re-query whatever
//! aggregate they display when an event concerning them arrives.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationEvent {
    pub kind: ChangeKind,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

#[derive(Clone)]
pub struct RealtimeHub {
    tx: broadcast::Sender<ApplicationEvent>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Having no subscribers is normal and not an error.
    pub fn publish(&self, event: ApplicationEvent) {
        match self.tx.send(event) {
            Ok(n) => debug!("Application event delivered to {n} subscriber(s)"),
            Err(_) => debug!("Application event dropped: no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ApplicationEvent> {
        self.tx.subscribe()
    }
}
