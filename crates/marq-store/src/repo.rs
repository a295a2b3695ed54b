//! Persistence collaborator contract

use std::future::Future;

use crate::bookmark::{Bookmark, NewBookmark};
use crate::Result;

/// Client side of the remote `bookmarks` table.
///
/// Ordering is the repo's job: `list_newest_first` returns rows by creation
/// time descending. Implementations must be cheaply cloneable; the futures
/// are awaited from the app's driver and from the realtime forwarder task,
/// hence `Send`.
pub trait BookmarkRepo {
    /// Fetch all visible rows, newest first. An empty table yields an empty
    /// list, not an error.
    fn list_newest_first(&self) -> impl Future<Output = Result<Vec<Bookmark>>> + Send;

    /// Insert one row. No client-side uniqueness check.
    fn insert(&self, bookmark: NewBookmark) -> impl Future<Output = Result<()>> + Send;

    /// Delete the row with the given identifier. Deleting an id that no
    /// longer exists is not an error.
    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}
