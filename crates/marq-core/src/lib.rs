//! Marq Core
//!
//! Central coordination layer for the bookmark manager: wires the session
//! manager, the bookmark store accessor and the realtime subscriber
//! together, validates form input, and renders application state into a
//! serializable view model for a stateless shell.

mod app;
mod error;
pub mod validate;
pub mod view;

pub use app::App;
pub use error::CoreError;

// Re-export core components
pub use marq_auth::{AuthError, AuthEvent, AuthProvider, OAuthProvider, Session, SessionManager};
pub use marq_realtime::{
    ChangeEvent, ChangeFeed, ChangeKind, RealtimeError, Subscriber, Subscription,
};
pub use marq_store::{
    Bookmark, BookmarkAccessor, BookmarkRepo, NewBookmark, StoreError, BOOKMARKS_TABLE,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
