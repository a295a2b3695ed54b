//! Bookmark rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One saved link, as stored in the remote `bookmarks` table.
///
/// `id` and `created_at` are assigned server-side. Rows are never mutated in
/// place; they are created by an explicit add and destroyed by an explicit
/// delete. Visibility is scoped to the owning user by the remote side's
/// access policy, not by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Opaque server-assigned identifier, unique per row
    pub id: String,
    /// Display title, non-empty
    pub title: String,
    /// Target URL, non-empty
    pub url: String,
    /// Owning user's identifier
    pub user_id: String,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new bookmark; the server fills in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub user_id: String,
}

impl NewBookmark {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            user_id: user_id.into(),
        }
    }
}
