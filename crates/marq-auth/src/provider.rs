//! Auth collaborator contract
//!
//! The provider is the external auth service's client side. It owns the
//! OAuth flow and token storage; this crate only consumes its state changes.

use std::future::Future;

use tokio::sync::broadcast;
use url::Url;

use crate::session::Session;
use crate::Result;

/// OAuth identity providers the auth collaborator can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth state changes pushed by the provider.
///
/// Every event replaces the held session value; there is no partial update.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A user signed in (OAuth callback completed)
    SignedIn(Session),
    /// The provider refreshed its token; the identity is unchanged
    TokenRefreshed(Session),
    /// The session ended (logout or expiry)
    SignedOut,
}

impl AuthEvent {
    /// The session value this event carries, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }
}

/// Client side of the external auth service.
///
/// Implementations must be cheaply cloneable; the futures they return are
/// awaited from the app's driver and from spawned tasks, hence `Send`.
pub trait AuthProvider {
    /// Ask the provider for any existing valid session.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// A long-lived subscription to auth state changes. Dropping the
    /// receiver releases the registration.
    fn events(&self) -> broadcast::Receiver<AuthEvent>;

    /// Start an OAuth hand-off and return the authorize URL for the shell
    /// to open. No local state changes; the result of the flow is observed
    /// later through [`events`](AuthProvider::events).
    fn begin_oauth(&self, provider: OAuthProvider) -> impl Future<Output = Result<Url>> + Send;

    /// Request session termination. Local state is cleared by the
    /// subsequent [`AuthEvent::SignedOut`], not by this call.
    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;
}
