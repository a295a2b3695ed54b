//! Change feed contract

use tokio::sync::broadcast;

use crate::event::ChangeEvent;

/// Client side of the realtime change-notification transport.
///
/// A feed watches one table and fans its change events out to any number of
/// subscriptions. Implementations must be cheaply cloneable.
pub trait ChangeFeed {
    /// Register interest in all change event types on the watched table.
    /// Dropping the returned [`Subscription`] releases the registration.
    fn subscribe(&self) -> Subscription;
}

/// A live registration on a change feed.
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn new(rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// The next change event, or `None` once the feed shuts down.
    ///
    /// A lagged receiver skips the missed triggers; since every event means
    /// a full resync, the next one recovers whatever was missed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        use broadcast::error::RecvError;

        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "change feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
