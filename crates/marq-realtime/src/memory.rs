//! In-memory change feed for tests and local development.

use tokio::sync::broadcast;

use crate::event::ChangeEvent;
use crate::feed::{ChangeFeed, Subscription};

const EVENT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct MemoryFeed {
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { events }
    }

    /// Push a change event to all current subscriptions.
    pub fn emit(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    /// Number of live subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for MemoryFeed {
    fn subscribe(&self) -> Subscription {
        Subscription::new(self.events.subscribe())
    }
}
