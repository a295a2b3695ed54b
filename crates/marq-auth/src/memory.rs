//! In-memory auth provider for tests and local development.
//!
//! Plays the role the real OAuth service plays in production: tests push
//! [`AuthEvent`]s through it to simulate sign-in callbacks, token refreshes
//! and expiries.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use url::Url;

use crate::provider::{AuthEvent, AuthProvider, OAuthProvider};
use crate::session::Session;
use crate::{AuthError, Result};

const EVENT_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct MemoryAuth {
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Start with an existing valid session, as after a previous login.
    pub fn with_session(session: Session) -> Self {
        let auth = Self::new();
        *auth.session.write() = Some(session);
        auth
    }

    /// Push an auth state change, updating the held session to match.
    pub fn emit(&self, event: AuthEvent) {
        *self.session.write() = event.session().cloned();
        let _ = self.events.send(event);
    }

    /// Simulate a completed OAuth callback.
    pub fn sign_in(&self, session: Session) {
        self.emit(AuthEvent::SignedIn(session));
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for MemoryAuth {
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>>> + Send {
        let session = self.session.read().clone();
        async move { Ok(session) }
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn begin_oauth(&self, provider: OAuthProvider) -> impl Future<Output = Result<Url>> + Send {
        let url = Url::parse(&format!("memory://auth/authorize?provider={provider}"))
            .map_err(|e| AuthError::Provider(e.to_string()));
        async move { url }
    }

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send {
        self.emit(AuthEvent::SignedOut);
        async move { Ok(()) }
    }
}
