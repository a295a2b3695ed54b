//! Session snapshot

use serde::{Deserialize, Serialize};

/// An authenticated identity, as last reported by the auth collaborator.
///
/// Owned by the [`SessionManager`](crate::SessionManager); everything else
/// works on cloned snapshots. Replaced wholesale on every auth event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier assigned by the auth provider
    pub user_id: String,
    /// Email address, when the provider shares one
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
