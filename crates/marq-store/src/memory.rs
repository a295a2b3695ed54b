//! In-memory bookmark repo for tests and local development.
//!
//! Stands in for the remote table: ids and timestamps are assigned here the
//! way the server would assign them, and rows are kept in insertion order so
//! creation order and insertion order coincide. Call counters let tests
//! assert how often the contract was exercised.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::bookmark::{Bookmark, NewBookmark};
use crate::repo::BookmarkRepo;
use crate::Result;

#[derive(Clone)]
pub struct MemoryBookmarks {
    inner: Arc<Inner>,
}

struct Inner {
    rows: RwLock<Vec<Bookmark>>,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MemoryBookmarks {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                rows: RwLock::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
                insert_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Insert a row directly, bypassing the contract: the equivalent of
    /// another client writing to the remote table.
    pub fn seed(
        &self,
        title: impl Into<String>,
        url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Bookmark {
        let row = Self::build_row(NewBookmark::new(title, url, user_id));
        self.inner.rows.write().push(row.clone());
        row
    }

    /// How many times `list_newest_first` was called.
    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    /// How many times `insert` was called.
    pub fn insert_calls(&self) -> usize {
        self.inner.insert_calls.load(Ordering::SeqCst)
    }

    fn build_row(bookmark: NewBookmark) -> Bookmark {
        Bookmark {
            id: Uuid::new_v4().to_string(),
            title: bookmark.title,
            url: bookmark.url,
            user_id: bookmark.user_id,
            created_at: Utc::now(),
        }
    }
}

impl Default for MemoryBookmarks {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkRepo for MemoryBookmarks {
    fn list_newest_first(&self) -> impl Future<Output = Result<Vec<Bookmark>>> + Send {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        let rows: Vec<Bookmark> = self.inner.rows.read().iter().rev().cloned().collect();
        async move { Ok(rows) }
    }

    fn insert(&self, bookmark: NewBookmark) -> impl Future<Output = Result<()>> + Send {
        self.inner.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.rows.write().push(Self::build_row(bookmark));
        async move { Ok(()) }
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
        self.inner.rows.write().retain(|row| row.id != id);
        async move { Ok(()) }
    }
}
