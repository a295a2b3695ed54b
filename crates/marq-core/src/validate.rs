//! Form validation
//!
//! Pure and synchronous. The full check runs on every submission attempt;
//! editing a field only clears that field's previous error, it does not
//! re-validate.

pub const TITLE_REQUIRED: &str = "Title is required";
pub const URL_REQUIRED: &str = "URL is required";

/// The add-form's input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Url,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Url => "url",
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Url => self.url.as_deref(),
        }
    }

    /// Optimistically clear one field's error, leaving the other intact.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Title => self.title = None,
            Field::Url => self.url = None,
        }
    }
}

/// The add-form's state: current input values plus validation messages.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub title: String,
    pub url: String,
    pub errors: FieldErrors,
}

/// Check both fields; empty or whitespace-only input yields that field's
/// message.
pub fn validate(title: &str, url: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if title.trim().is_empty() {
        errors.title = Some(TITLE_REQUIRED.to_string());
    }

    if url.trim().is_empty() {
        errors.url = Some(URL_REQUIRED.to_string());
    }

    errors
}
