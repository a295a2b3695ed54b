//! Application container
//!
//! Owns the managers and the add-form state, and carries the data flow
//! between them: session changes gate the store accessor and the realtime
//! subscriber, change events trigger full refetches, and user actions go
//! through validation before touching the remote side.

use parking_lot::RwLock;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use url::Url;

use marq_auth::{AuthEvent, AuthProvider, SessionManager};
use marq_realtime::{ChangeFeed, Subscriber};
use marq_store::{BookmarkAccessor, BookmarkRepo};

use crate::error::CoreError;
use crate::validate::{self, Field, FieldErrors, FormState};
use crate::view::{self, View};
use crate::Result;

pub struct App<A, R, F> {
    sessions: SessionManager<A>,
    bookmarks: BookmarkAccessor<R>,
    changes: Subscriber<F>,
    form: Arc<RwLock<FormState>>,
}

impl<A, R, F> App<A, R, F>
where
    A: AuthProvider,
    R: BookmarkRepo + Clone + Send + Sync + 'static,
    F: ChangeFeed,
{
    pub fn new(auth: A, repo: R, feed: F) -> Self {
        Self {
            sessions: SessionManager::new(auth),
            bookmarks: BookmarkAccessor::new(repo),
            changes: Subscriber::new(feed),
            form: Arc::new(RwLock::new(FormState::default())),
        }
    }

    /// Restore any existing session; if one is present, do the initial
    /// fetch and register on the change feed.
    pub async fn initialize(&self) -> Result<()> {
        let session = self.sessions.initialize().await?;

        if session.is_some() {
            self.bookmarks.refresh().await?;
            self.ensure_subscribed();
        }

        tracing::info!(authenticated = session.is_some(), "app initialized");

        Ok(())
    }

    /// Apply one auth state change: any event replaces the session; when
    /// authenticated the list is refetched and the feed registration is
    /// ensured, when signed out the registration is released.
    pub async fn apply_auth_event(&self, event: &AuthEvent) -> Result<()> {
        match self.sessions.apply(event) {
            Some(_) => {
                self.bookmarks.refresh().await?;
                self.ensure_subscribed();
            }
            None => self.changes.deactivate(),
        }

        Ok(())
    }

    /// Pump auth events until the provider shuts down. Collaborator
    /// failures are logged and the loop keeps going; every failure degrades
    /// to "no visible change".
    pub async fn run(&self) -> Result<()> {
        let mut events = self.sessions.events();

        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = self.apply_auth_event(&event).await {
                        tracing::warn!(error = %e, "auth event handling failed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "auth events lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }

    /// Start the OAuth hand-off; returns the authorize URL for the shell.
    pub async fn login(&self) -> Result<Url> {
        Ok(self.sessions.login().await?)
    }

    /// Request session termination; local state clears when the provider's
    /// sign-out event comes back around.
    pub async fn logout(&self) -> Result<()> {
        Ok(self.sessions.logout().await?)
    }

    /// Edit the title input, clearing only the title's error.
    pub fn set_title(&self, value: impl Into<String>) {
        let mut form = self.form.write();
        form.title = value.into();
        form.errors.clear(Field::Title);
    }

    /// Edit the URL input, clearing only the URL's error.
    pub fn set_url(&self, value: impl Into<String>) {
        let mut form = self.form.write();
        form.url = value.into();
        form.errors.clear(Field::Url);
    }

    /// Validate the form and, if it passes, add the bookmark for the
    /// current user and clear the inputs. Validation failures are recorded
    /// as field errors and never reach the store.
    pub async fn submit(&self) -> Result<()> {
        let (title, url) = {
            let form = self.form.read();
            (form.title.clone(), form.url.clone())
        };

        let errors = validate::validate(&title, &url);
        if !errors.is_empty() {
            self.form.write().errors = errors;
            return Ok(());
        }

        let user_id = self
            .sessions
            .user_id()
            .ok_or(CoreError::NotAuthenticated)?;

        self.form.write().errors = FieldErrors::default();
        self.bookmarks.add(title, url, user_id).await?;

        let mut form = self.form.write();
        form.title.clear();
        form.url.clear();

        Ok(())
    }

    /// Delete one bookmark by id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.bookmarks.remove(id).await?;
        Ok(())
    }

    /// Render current state.
    pub fn view(&self) -> View {
        let session = self.sessions.session();
        let bookmarks = self.bookmarks.bookmarks();
        let form = self.form.read();

        view::render(session.as_ref(), &bookmarks, &form)
    }

    /// Release the feed registration and drop the session on teardown.
    /// In-flight requests are not cancelled, only the registrations go.
    pub fn dispose(&self) {
        self.changes.deactivate();
        self.sessions.dispose();
    }

    fn ensure_subscribed(&self) {
        if self.changes.is_active() {
            return;
        }

        let bookmarks = self.bookmarks.clone();
        self.changes.activate(move |event| {
            let bookmarks = bookmarks.clone();
            async move {
                tracing::trace!(kind = %event.kind, "change event; refetching");
                if let Err(e) = bookmarks.refresh().await {
                    tracing::warn!(error = %e, "refetch after change event failed");
                }
            }
        });
    }
}

impl<A: Clone, R: Clone, F: Clone> Clone for App<A, R, F> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            bookmarks: self.bookmarks.clone(),
            changes: self.changes.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{TITLE_REQUIRED, URL_REQUIRED};
    use crate::view::EMPTY_NOTICE;
    use marq_auth::memory::MemoryAuth;
    use marq_auth::Session;
    use marq_realtime::memory::MemoryFeed;
    use marq_realtime::{ChangeEvent, ChangeKind};
    use marq_store::memory::MemoryBookmarks;
    use std::time::Duration;

    struct Fixture {
        auth: MemoryAuth,
        repo: MemoryBookmarks,
        feed: MemoryFeed,
        app: App<MemoryAuth, MemoryBookmarks, MemoryFeed>,
    }

    fn fixture() -> Fixture {
        let auth = MemoryAuth::new();
        let repo = MemoryBookmarks::new();
        let feed = MemoryFeed::new();
        let app = App::new(auth.clone(), repo.clone(), feed.clone());
        Fixture {
            auth,
            repo,
            feed,
            app,
        }
    }

    async fn signed_in_fixture() -> Fixture {
        let f = fixture();
        f.auth.sign_in(Session::new("user-1"));
        f.app.initialize().await.unwrap();
        f
    }

    async fn wait_for(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    fn home(view: View) -> crate::view::HomeView {
        match view {
            View::Home(home) => home,
            View::Login(_) => panic!("expected home view"),
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_load_shows_login_only() {
        let f = fixture();
        f.app.initialize().await.unwrap();

        assert!(matches!(f.app.view(), View::Login(_)));
        assert_eq!(f.repo.list_calls(), 0);
        assert_eq!(f.feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticated_load_with_zero_rows_shows_empty_notice() {
        let f = signed_in_fixture().await;

        let home = home(f.app.view());
        assert_eq!(home.empty_notice, Some(EMPTY_NOTICE));
        assert!(home.bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_submission_never_reaches_the_repo() {
        let f = signed_in_fixture().await;

        f.app.set_title("   ");
        f.app.set_url("");
        f.app.submit().await.unwrap();

        assert_eq!(f.repo.insert_calls(), 0);

        let home = home(f.app.view());
        assert_eq!(home.form.title_error.as_deref(), Some(TITLE_REQUIRED));
        assert_eq!(home.form.url_error.as_deref(), Some(URL_REQUIRED));
    }

    #[tokio::test]
    async fn test_valid_submission_adds_once_with_user_id() {
        let f = signed_in_fixture().await;
        let fetches_before = f.repo.list_calls();

        f.app.set_title("Docs");
        f.app.set_url("https://example.com");
        f.app.submit().await.unwrap();

        assert_eq!(f.repo.insert_calls(), 1);
        assert_eq!(f.repo.list_calls(), fetches_before + 1);

        let home = home(f.app.view());
        assert_eq!(home.bookmarks.len(), 1);
        assert_eq!(home.bookmarks[0].title, "Docs");
        assert_eq!(home.bookmarks[0].href, "https://example.com");

        // Inputs and errors are cleared after a successful submission.
        assert!(home.form.title_value.is_empty());
        assert!(home.form.url_value.is_empty());
        assert!(home.form.title_error.is_none());
        assert!(home.form.url_error.is_none());

        let rows = f.repo.list_newest_first().await.unwrap();
        assert_eq!(rows[0].user_id, "user-1");
    }

    #[tokio::test]
    async fn test_new_bookmark_lands_at_the_head() {
        let f = signed_in_fixture().await;

        f.app.set_title("First");
        f.app.set_url("https://a.example");
        f.app.submit().await.unwrap();

        f.app.set_title("Second");
        f.app.set_url("https://b.example");
        f.app.submit().await.unwrap();

        let home = home(f.app.view());
        assert_eq!(home.bookmarks[0].title, "Second");
        assert_eq!(home.bookmarks[1].title, "First");
    }

    #[tokio::test]
    async fn test_delete_removes_the_row_for_good() {
        let f = signed_in_fixture().await;

        f.app.set_title("Docs");
        f.app.set_url("https://example.com");
        f.app.submit().await.unwrap();

        let id = home(f.app.view()).bookmarks[0].id.clone();
        f.app.delete(&id).await.unwrap();

        let home = home(f.app.view());
        assert!(home.bookmarks.iter().all(|b| b.id != id));
        assert_eq!(home.empty_notice, Some(EMPTY_NOTICE));
    }

    #[tokio::test]
    async fn test_editing_a_field_clears_only_its_error() {
        let f = signed_in_fixture().await;

        f.app.submit().await.unwrap(); // both fields empty

        f.app.set_title("Docs");

        let home = home(f.app.view());
        assert!(home.form.title_error.is_none());
        assert_eq!(home.form.url_error.as_deref(), Some(URL_REQUIRED));
    }

    #[tokio::test]
    async fn test_unrelated_change_event_triggers_full_refetch() {
        let f = signed_in_fixture().await;
        let fetches_before = f.repo.list_calls();

        // Another client writes to the table; the payload is not ours.
        let row = f.repo.seed("Elsewhere", "https://other.example", "user-2");
        f.feed.emit(ChangeEvent::new(
            ChangeKind::Insert,
            "bookmarks",
            Some(row.id.clone()),
        ));

        wait_for(|| f.repo.list_calls() > fetches_before).await;
        wait_for(|| home(f.app.view()).bookmarks.len() == 1).await;
    }

    #[tokio::test]
    async fn test_sign_out_releases_the_feed_registration() {
        let f = signed_in_fixture().await;
        assert_eq!(f.feed.receiver_count(), 1);

        f.app.logout().await.unwrap();
        let event = f.auth.events().try_recv();
        // The sign-out event was broadcast before we subscribed here; drive
        // the app directly the way the run loop would.
        assert!(event.is_err());
        f.app.apply_auth_event(&AuthEvent::SignedOut).await.unwrap();

        assert!(matches!(f.app.view(), View::Login(_)));
        wait_for(|| f.feed.receiver_count() == 0).await;
    }

    #[tokio::test]
    async fn test_session_transition_does_not_stack_subscriptions() {
        let f = signed_in_fixture().await;

        f.app
            .apply_auth_event(&AuthEvent::TokenRefreshed(Session::new("user-1")))
            .await
            .unwrap();

        assert_eq!(f.feed.receiver_count(), 1);
    }

    #[tokio::test]
    async fn test_run_loop_applies_auth_events() {
        let f = fixture();
        f.app.initialize().await.unwrap();

        let app = f.app.clone();
        let driver = tokio::spawn(async move { app.run().await });

        tokio::task::yield_now().await;
        f.auth.sign_in(Session::new("user-1"));

        wait_for(|| matches!(f.app.view(), View::Home(_))).await;

        driver.abort();
    }

    #[tokio::test]
    async fn test_dispose_releases_everything() {
        let f = signed_in_fixture().await;

        f.app.dispose();

        assert!(matches!(f.app.view(), View::Login(_)));
        wait_for(|| f.feed.receiver_count() == 0).await;
    }

    #[tokio::test]
    async fn test_submit_without_session_is_an_error() {
        let f = fixture();
        f.app.initialize().await.unwrap();

        f.app.set_title("Docs");
        f.app.set_url("https://example.com");

        assert!(matches!(
            f.app.submit().await,
            Err(CoreError::NotAuthenticated)
        ));
        assert_eq!(f.repo.insert_calls(), 0);
    }
}
