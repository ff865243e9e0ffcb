//! Live collection snapshots
//!
//! One `watch` channel per collection path. Writers publish the full
//! collection after each change; subscribers see the latest snapshot, so a
//! slow subscriber skips intermediate states rather than queueing them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dossier_core::CollectionPath;
use serde_json::Value;
use tokio::sync::watch;

pub type Snapshot = Arc<Vec<Value>>;

#[derive(Default)]
pub struct SubscriptionHub {
    channels: Mutex<HashMap<CollectionPath, watch::Sender<Snapshot>>>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver for `path`, marked as having seen the current value
    pub fn receiver(&self, path: &CollectionPath) -> watch::Receiver<Snapshot> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let sender = channels
            .entry(path.clone())
            .or_insert_with(|| watch::channel(Arc::new(Vec::new())).0);
        let mut rx = sender.subscribe();
        rx.borrow_and_update();
        rx
    }

    /// True when at least one subscription on `path` is still open
    pub fn has_subscribers(&self, path: &CollectionPath) -> bool {
        let channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .get(path)
            .map(|sender| sender.receiver_count() > 0)
            .unwrap_or(false)
    }

    /// Send a new snapshot. Channels whose subscribers are all gone are dropped.
    pub fn publish(&self, path: &CollectionPath, snapshot: Vec<Value>) {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(sender) = channels.get(path) else {
            return;
        };
        if sender.receiver_count() == 0 {
            channels.remove(path);
            return;
        }
        sender.send_replace(Arc::new(snapshot));
        tracing::trace!(collection = %path, "Published collection snapshot");
    }
}

/// Handle for a live collection subscription.
///
/// Yields the snapshot taken at subscribe time, then one snapshot per change.
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) closes it;
/// nothing is delivered afterwards.
pub struct Subscription {
    path: CollectionPath,
    initial: Option<Vec<Value>>,
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub fn new(path: CollectionPath, initial: Vec<Value>, rx: watch::Receiver<Snapshot>) -> Self {
        Subscription {
            path,
            initial: Some(initial),
            rx,
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    /// Next snapshot, or `None` once the store has shut down.
    pub async fn next(&mut self) -> Option<Vec<Value>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        self.rx.changed().await.ok()?;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(snapshot.as_ref().clone())
    }

    pub fn unsubscribe(self) {
        tracing::debug!(collection = %self.path, "Subscription released");
    }
}
