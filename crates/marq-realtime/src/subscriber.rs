//! Realtime subscriber
//!
//! Owns at most one live registration on the feed and forwards every event,
//! regardless of payload, to the handler. Active only while a session
//! exists; the app deactivates it on sign-out and teardown.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::event::ChangeEvent;
use crate::feed::ChangeFeed;

pub struct Subscriber<F> {
    feed: F,
    active: Arc<Mutex<Option<ForwardTask>>>,
}

struct ForwardTask {
    handle: JoinHandle<()>,
}

impl Drop for ForwardTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl<F: ChangeFeed> Subscriber<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Register on the feed and forward events to `handler` until
    /// deactivated. A no-op while a registration is already live, so
    /// session transitions cannot stack duplicates.
    pub fn activate<H, Fut>(&self, handler: H)
    where
        H: Fn(ChangeEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut active = self.active.lock();
        if active.is_some() {
            return;
        }

        let mut subscription = self.feed.subscribe();
        let handle = tokio::spawn(async move {
            while let Some(event) = subscription.next().await {
                handler(event).await;
            }
        });

        tracing::debug!("realtime subscription registered");

        *active = Some(ForwardTask { handle });
    }

    /// Release the registration, if any.
    pub fn deactivate(&self) {
        if self.active.lock().take().is_some() {
            tracing::debug!("realtime subscription released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }
}

impl<F: Clone> Clone for Subscriber<F> {
    fn clone(&self) -> Self {
        Self {
            feed: self.feed.clone(),
            active: Arc::clone(&self.active),
        }
    }
}
