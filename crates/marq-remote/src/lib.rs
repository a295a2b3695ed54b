//! Marq Remote
//!
//! HTTP-backed implementations of the collaborator contracts, speaking to a
//! Supabase-style backend: token-bearing auth endpoints, a rows API for the
//! `bookmarks` table, and a streamed change feed. One token cell is shared
//! across all three clients so store and feed requests are scoped to the
//! signed-in user.

mod auth;
mod bookmarks;
mod config;
mod error;
mod feed;

pub use auth::RemoteAuth;
pub use bookmarks::RemoteBookmarks;
pub use config::RemoteConfig;
pub use error::RemoteError;
pub use feed::RemoteFeed;

use std::sync::Arc;

use parking_lot::RwLock;

use marq_core::App;
use marq_store::BOOKMARKS_TABLE;

/// Access token shared by the auth, store and feed clients.
pub(crate) type TokenCell = Arc<RwLock<Option<String>>>;

/// Header carrying the project's anonymous API key on every request.
pub(crate) const APIKEY_HEADER: &str = "apikey";

pub type Result<T> = std::result::Result<T, RemoteError>;

/// The app wired to the remote collaborators.
pub type RemoteApp = App<RemoteAuth, RemoteBookmarks, RemoteFeed>;

/// The three collaborator clients, sharing one HTTP client and token cell.
pub struct Remote {
    pub auth: RemoteAuth,
    pub bookmarks: RemoteBookmarks,
    pub feed: RemoteFeed,
}

impl Remote {
    /// Build the clients and start the change-feed reader. Must be called
    /// within a tokio runtime.
    pub fn connect(config: RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = TokenCell::default();

        let auth = RemoteAuth::new(http.clone(), &config, token.clone())?;
        let bookmarks = RemoteBookmarks::new(http.clone(), &config, token.clone())?;
        let feed = RemoteFeed::connect(http, &config, token, BOOKMARKS_TABLE)?;

        tracing::info!(base_url = %config.base_url, "remote collaborators connected");

        Ok(Self {
            auth,
            bookmarks,
            feed,
        })
    }

    pub fn into_app(self) -> RemoteApp {
        App::new(self.auth, self.bookmarks, self.feed)
    }
}
