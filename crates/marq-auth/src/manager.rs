//! Session Manager
//!
//! Tracks the current authenticated identity and exposes read snapshots to
//! the rest of the app. State changes arrive exclusively through
//! [`initialize`](SessionManager::initialize) and
//! [`apply`](SessionManager::apply); `login`/`logout` only delegate to the
//! provider and let the resulting event do the mutation.

use parking_lot::RwLock;
use std::sync::Arc;

use tokio::sync::broadcast;
use url::Url;

use crate::provider::{AuthEvent, AuthProvider, OAuthProvider};
use crate::session::Session;
use crate::Result;

pub struct SessionManager<A> {
    provider: A,
    current: Arc<RwLock<Option<Session>>>,
}

impl<A: AuthProvider> SessionManager<A> {
    pub fn new(provider: A) -> Self {
        Self {
            provider,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Ask the provider for any existing valid session and hold it.
    pub async fn initialize(&self) -> Result<Option<Session>> {
        let session = self.provider.current_session().await?;
        *self.current.write() = session.clone();

        tracing::info!(
            authenticated = session.is_some(),
            "session manager initialized"
        );

        Ok(session)
    }

    /// Subscribe to the provider's auth state changes.
    pub fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.provider.events()
    }

    /// Replace the held session with whatever the event carries and return
    /// the new snapshot.
    pub fn apply(&self, event: &AuthEvent) -> Option<Session> {
        let next = event.session().cloned();
        *self.current.write() = next.clone();

        tracing::debug!(authenticated = next.is_some(), "auth state changed");

        next
    }

    /// Start the OAuth hand-off with the fixed provider and return the
    /// authorize URL for the shell to open.
    pub async fn login(&self) -> Result<Url> {
        self.provider.begin_oauth(OAuthProvider::Google).await
    }

    /// Request session termination; the held value clears when the
    /// provider's `SignedOut` event comes back through [`apply`].
    pub async fn logout(&self) -> Result<()> {
        self.provider.sign_out().await
    }

    pub fn session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.user_id.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Drop the held session on teardown. Event registrations are released
    /// by their owners dropping the receivers.
    pub fn dispose(&self) {
        *self.current.write() = None;
    }
}

impl<A: Clone> Clone for SessionManager<A> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            current: Arc::clone(&self.current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAuth;

    #[tokio::test]
    async fn test_initialize_restores_existing_session() {
        let auth = MemoryAuth::with_session(Session::new("user-1"));
        let manager = SessionManager::new(auth);

        let session = manager.initialize().await.unwrap();
        assert_eq!(session.unwrap().user_id, "user-1");
        assert!(manager.is_authenticated());
        assert_eq!(manager.user_id().as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_initialize_without_session() {
        let manager = SessionManager::new(MemoryAuth::new());

        let session = manager.initialize().await.unwrap();
        assert!(session.is_none());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_apply_replaces_session_wholesale() {
        let manager = SessionManager::new(MemoryAuth::new());

        manager.apply(&AuthEvent::SignedIn(Session::new("user-1")));
        assert_eq!(manager.user_id().as_deref(), Some("user-1"));

        let refreshed = Session::new("user-1").with_email("a@example.com");
        manager.apply(&AuthEvent::TokenRefreshed(refreshed));
        assert_eq!(
            manager.session().unwrap().email.as_deref(),
            Some("a@example.com")
        );

        manager.apply(&AuthEvent::SignedOut);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_only_via_event() {
        let auth = MemoryAuth::with_session(Session::new("user-1"));
        let manager = SessionManager::new(auth);
        manager.initialize().await.unwrap();

        let mut events = manager.events();
        manager.logout().await.unwrap();

        // The local value is untouched until the event is applied.
        assert!(manager.is_authenticated());
        let event = events.try_recv().unwrap();
        manager.apply(&event);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_returns_authorize_url() {
        let manager = SessionManager::new(MemoryAuth::new());
        let url = manager.login().await.unwrap();
        assert!(url.as_str().contains("provider=google"));
    }
}
