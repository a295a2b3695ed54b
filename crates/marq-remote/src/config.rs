//! Remote endpoint configuration

use url::Url;

use crate::{RemoteError, Result};

/// Where the backend lives and how to identify the project to it.
///
/// Credentials are provided by the embedding shell; nothing here is read
/// implicitly except through [`from_env`](RemoteConfig::from_env).
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the backend project
    pub base_url: Url,
    /// Anonymous API key sent with every request
    pub anon_key: String,
    /// Where the OAuth flow should land after the provider hand-off
    pub redirect_url: Option<Url>,
}

impl RemoteConfig {
    pub fn new(base_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            base_url,
            anon_key: anon_key.into(),
            redirect_url: None,
        }
    }

    pub fn with_redirect(mut self, redirect_url: Url) -> Self {
        self.redirect_url = Some(redirect_url);
        self
    }

    /// Read `MARQ_REMOTE_URL`, `MARQ_ANON_KEY` and the optional
    /// `MARQ_REDIRECT_URL` from the environment.
    pub fn from_env() -> Result<Self> {
        let base_url = require_env("MARQ_REMOTE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        let anon_key = require_env("MARQ_ANON_KEY")?;

        let redirect_url = match std::env::var("MARQ_REDIRECT_URL") {
            Ok(value) => {
                Some(Url::parse(&value).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?)
            }
            Err(_) => {
                tracing::debug!("MARQ_REDIRECT_URL not set; OAuth uses the provider default");
                None
            }
        };

        Ok(Self {
            base_url,
            anon_key,
            redirect_url,
        })
    }

    /// Resolve an endpoint under the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn require_env(key: &'static str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        tracing::warn!(key, "required environment variable not found");
        RemoteError::MissingEnv(key)
    })
}
