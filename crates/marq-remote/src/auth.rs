//! Remote auth client
//!
//! Token-bearing endpoints in the GoTrue style: `auth/v1/user` answers "who
//! does this token belong to", `auth/v1/authorize` is the OAuth hand-off,
//! `auth/v1/logout` terminates the session. The OAuth redirect itself
//! happens in the shell; it feeds the callback token back in through
//! [`complete_oauth`](RemoteAuth::complete_oauth).

use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::broadcast;
use url::Url;

use marq_auth::{AuthError, AuthEvent, AuthProvider, OAuthProvider, Session};

use crate::config::RemoteConfig;
use crate::{Result, TokenCell, APIKEY_HEADER};

const EVENT_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct RemoteAuth {
    http: reqwest::Client,
    user_url: Url,
    logout_url: Url,
    authorize_url: Url,
    redirect_url: Option<Url>,
    anon_key: String,
    token: TokenCell,
    events: broadcast::Sender<AuthEvent>,
}

#[derive(Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl RemoteAuth {
    pub(crate) fn new(http: reqwest::Client, config: &RemoteConfig, token: TokenCell) -> Result<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            user_url: config.endpoint(&["auth", "v1", "user"])?,
            logout_url: config.endpoint(&["auth", "v1", "logout"])?,
            authorize_url: config.endpoint(&["auth", "v1", "authorize"])?,
            redirect_url: config.redirect_url.clone(),
            anon_key: config.anon_key.clone(),
            token,
            events,
        })
    }

    /// Store the access token delivered by the shell's OAuth callback,
    /// resolve it to a user, and announce the sign-in.
    pub async fn complete_oauth(
        &self,
        access_token: impl Into<String>,
    ) -> marq_auth::Result<Session> {
        let access_token = access_token.into();
        *self.token.write() = Some(access_token.clone());

        match self.fetch_user(&access_token).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, "oauth sign-in completed");
                let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
                Ok(session)
            }
            Err(e) => {
                *self.token.write() = None;
                Err(e)
            }
        }
    }

    async fn fetch_user(&self, token: &str) -> marq_auth::Result<Session> {
        let response = self
            .http
            .get(self.user_url.clone())
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!("HTTP {}", response.status())));
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        Ok(Session {
            user_id: user.id,
            email: user.email,
        })
    }
}

impl AuthProvider for RemoteAuth {
    fn current_session(
        &self,
    ) -> impl Future<Output = marq_auth::Result<Option<Session>>> + Send {
        async move {
            let Some(token) = self.token.read().clone() else {
                return Ok(None);
            };

            let response = self
                .http
                .get(self.user_url.clone())
                .header(APIKEY_HEADER, &self.anon_key)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;

            // An expired or revoked token is an absent session, not a failure.
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                *self.token.write() = None;
                return Ok(None);
            }

            if !response.status().is_success() {
                return Err(AuthError::Provider(format!("HTTP {}", response.status())));
            }

            let user: RemoteUser = response
                .json()
                .await
                .map_err(|e| AuthError::Decode(e.to_string()))?;

            Ok(Some(Session {
                user_id: user.id,
                email: user.email,
            }))
        }
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn begin_oauth(
        &self,
        provider: OAuthProvider,
    ) -> impl Future<Output = marq_auth::Result<Url>> + Send {
        let mut url = self.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider.as_str());
            if let Some(redirect) = &self.redirect_url {
                query.append_pair("redirect_to", redirect.as_str());
            }
        }

        tracing::debug!(%provider, "oauth hand-off prepared");

        async move { Ok(url) }
    }

    fn sign_out(&self) -> impl Future<Output = marq_auth::Result<()>> + Send {
        async move {
            let token = self.token.read().clone();
            if let Some(token) = token {
                let response = self
                    .http
                    .post(self.logout_url.clone())
                    .header(APIKEY_HEADER, &self.anon_key)
                    .bearer_auth(&token)
                    .send()
                    .await
                    .map_err(|e| AuthError::Transport(e.to_string()))?;

                // A token the server no longer recognizes is already out.
                if !response.status().is_success()
                    && response.status() != StatusCode::UNAUTHORIZED
                {
                    return Err(AuthError::Provider(format!("HTTP {}", response.status())));
                }
            }

            *self.token.write() = None;
            let _ = self.events.send(AuthEvent::SignedOut);

            tracing::info!("signed out");

            Ok(())
        }
    }
}
