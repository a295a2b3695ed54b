//! Marq Realtime
//!
//! Change notifications for the remote `bookmarks` table. The subscriber
//! deliberately ignores event payloads and triggers a full refetch on every
//! event, trading efficiency for simplicity. Registrations are released
//! when the session ends or the app is torn down, so session transitions
//! never stack duplicate subscriptions.

mod error;
mod event;
mod feed;
pub mod memory;
mod subscriber;

pub use error::RealtimeError;
pub use event::{ChangeEvent, ChangeKind};
pub use feed::{ChangeFeed, Subscription};
pub use subscriber::Subscriber;

pub type Result<T> = std::result::Result<T, RealtimeError>;
