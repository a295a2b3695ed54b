//! View model
//!
//! A pure function of application state. The shell that consumes this is
//! stateless; everything it shows is here, and nothing here depends on how
//! it is shown.

use serde::Serialize;

use marq_auth::Session;
use marq_store::Bookmark;

use crate::validate::FormState;

pub const APP_HEADING: &str = "Smart Bookmark App";
pub const LOGIN_HEADING: &str = "Welcome Back";
pub const LOGIN_SUBHEADING: &str = "To Bookmark Application";
pub const LOGIN_ACTION: &str = "Login with Google";
pub const EMPTY_NOTICE: &str = "No bookmarks added yet.";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    /// Unauthenticated: a login affordance and nothing else.
    Login(LoginView),
    /// Authenticated: header, add-form and the bookmark list.
    Home(HomeView),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub heading: &'static str,
    pub subheading: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub heading: &'static str,
    pub form: FormView,
    pub bookmarks: Vec<BookmarkItem>,
    /// Shown in place of the list when it is empty.
    pub empty_notice: Option<&'static str>,
}

/// The add-form: two inputs with inline error text and a submit affordance.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub title_value: String,
    pub url_value: String,
    pub title_error: Option<String>,
    pub url_error: Option<String>,
}

/// One list row: the title links to the URL in a new context, and each row
/// carries a delete affordance keyed by `id`.
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkItem {
    pub id: String,
    pub title: String,
    pub href: String,
}

/// Render current state into the view model.
pub fn render(session: Option<&Session>, bookmarks: &[Bookmark], form: &FormState) -> View {
    if session.is_none() {
        return View::Login(LoginView {
            heading: LOGIN_HEADING,
            subheading: LOGIN_SUBHEADING,
            action: LOGIN_ACTION,
        });
    }

    let items: Vec<BookmarkItem> = bookmarks
        .iter()
        .map(|b| BookmarkItem {
            id: b.id.clone(),
            title: b.title.clone(),
            href: b.url.clone(),
        })
        .collect();

    View::Home(HomeView {
        heading: APP_HEADING,
        form: FormView {
            title_value: form.title.clone(),
            url_value: form.url.clone(),
            title_error: form.errors.title.clone(),
            url_error: form.errors.url.clone(),
        },
        empty_notice: items.is_empty().then_some(EMPTY_NOTICE),
        bookmarks: items,
    })
}
