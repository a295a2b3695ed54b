//! Bookmark store accessor
//!
//! Holds the single in-memory bookmark list. Mutations go to the repo and
//! then resynchronize with a full refetch; nothing is applied optimistically.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::bookmark::{Bookmark, NewBookmark};
use crate::repo::BookmarkRepo;
use crate::Result;

pub struct BookmarkAccessor<R> {
    repo: R,
    bookmarks: Arc<RwLock<Vec<Bookmark>>>,
}

impl<R: BookmarkRepo> BookmarkAccessor<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            bookmarks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the entire held list with a fresh fetch.
    ///
    /// If two refreshes race, the later-resolving one wins; there is no
    /// sequence guard.
    pub async fn refresh(&self) -> Result<()> {
        let rows = self.repo.list_newest_first().await?;

        tracing::debug!(count = rows.len(), "refetched bookmark list");

        *self.bookmarks.write() = rows;
        Ok(())
    }

    /// Insert a row for the given user, then resynchronize.
    pub async fn add(
        &self,
        title: impl Into<String>,
        url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<()> {
        let bookmark = NewBookmark::new(title, url, user_id);

        tracing::debug!(title = %bookmark.title, "adding bookmark");

        self.repo.insert(bookmark).await?;
        self.refresh().await
    }

    /// Delete the row with the given id, then resynchronize.
    pub async fn remove(&self, id: &str) -> Result<()> {
        tracing::debug!(bookmark_id = %id, "removing bookmark");

        self.repo.delete(id).await?;
        self.refresh().await
    }

    /// Snapshot of the held list, newest first.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.bookmarks.read().clone()
    }
}

impl<R: Clone> Clone for BookmarkAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            bookmarks: Arc::clone(&self.bookmarks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBookmarks;

    #[tokio::test]
    async fn test_refresh_replaces_list() {
        let repo = MemoryBookmarks::new();
        let accessor = BookmarkAccessor::new(repo.clone());

        repo.seed("Docs", "https://example.com", "user-1");
        assert!(accessor.bookmarks().is_empty());

        accessor.refresh().await.unwrap();
        assert_eq!(accessor.bookmarks().len(), 1);
    }

    #[tokio::test]
    async fn test_add_inserts_once_and_refetches_once() {
        let repo = MemoryBookmarks::new();
        let accessor = BookmarkAccessor::new(repo.clone());

        accessor
            .add("Docs", "https://example.com", "user-1")
            .await
            .unwrap();

        assert_eq!(repo.insert_calls(), 1);
        assert_eq!(repo.list_calls(), 1);

        let bookmarks = accessor.bookmarks();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].title, "Docs");
        assert_eq!(bookmarks[0].url, "https://example.com");
        assert_eq!(bookmarks[0].user_id, "user-1");
    }

    #[tokio::test]
    async fn test_newest_bookmark_comes_first() {
        let repo = MemoryBookmarks::new();
        let accessor = BookmarkAccessor::new(repo.clone());

        accessor.add("First", "https://a.example", "u").await.unwrap();
        accessor.add("Second", "https://b.example", "u").await.unwrap();

        let bookmarks = accessor.bookmarks();
        assert_eq!(bookmarks[0].title, "Second");
        assert_eq!(bookmarks[1].title, "First");
    }

    #[tokio::test]
    async fn test_removed_id_never_reappears() {
        let repo = MemoryBookmarks::new();
        let accessor = BookmarkAccessor::new(repo.clone());

        let kept = repo.seed("Keep", "https://a.example", "u");
        let gone = repo.seed("Drop", "https://b.example", "u");

        accessor.remove(&gone.id).await.unwrap();

        let ids: Vec<_> = accessor.bookmarks().into_iter().map(|b| b.id).collect();
        assert!(ids.contains(&kept.id));
        assert!(!ids.contains(&gone.id));
    }

    #[tokio::test]
    async fn test_empty_result_is_empty_list() {
        let accessor = BookmarkAccessor::new(MemoryBookmarks::new());
        accessor.refresh().await.unwrap();
        assert!(accessor.bookmarks().is_empty());
    }
}
