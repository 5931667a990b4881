//! Event fan-out — tracks subscribers of a game session and provides
//! `broadcast()` to push events to all of them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use super::events::GameEvent;

/// Handle for a single subscriber. The subscriber owns the receiving half;
/// the feed keeps the sending half.
pub type SubscriberSender = mpsc::UnboundedSender<GameEvent>;

/// A unique ID assigned to each subscriber.
pub type SubscriberId = u64;

/// Tracks subscribers and delivers events to all of them.
#[derive(Debug)]
pub struct EventFeed {
    subs: RwLock<HashMap<SubscriberId, SubscriberSender>>,
    /// Monotonically increasing counter for subscriber IDs.
    next_id: std::sync::atomic::AtomicU64,
}

impl EventFeed {
    /// Create a new, empty feed.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new subscriber, returning (id, receiver).
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<GameEvent>) {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.subs.write().await.insert(id, tx);

        debug!(subscriber_id = id, "event subscriber attached");
        (id, rx)
    }

    /// Remove a subscriber.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        self.subs.write().await.remove(&id);
        debug!(subscriber_id = id, "event subscriber detached");
    }

    /// Deliver an event to every subscriber, dropping any whose receiver
    /// has gone away.
    pub async fn broadcast(&self, event: GameEvent) {
        let subs = self.subs.read().await;
        let mut stale: Vec<SubscriberId> = Vec::new();
        for (&id, tx) in subs.iter() {
            if tx.send(event.clone()).is_err() {
                stale.push(id);
            }
        }
        drop(subs); // release read lock before write

        if !stale.is_empty() {
            let mut subs = self.subs.write().await;
            for id in stale {
                subs.remove(&id);
                warn!(subscriber_id = id, "removed stale subscriber");
            }
        }
    }

    /// Number of attached subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subs.read().await.len()
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self {
            subs: RwLock::new(HashMap::new()),
            next_id: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
