//! Remote bookmark repo
//!
//! PostgREST-style rows API on the `bookmarks` table. Ordering is pushed to
//! the server (`order=created_at.desc`); row visibility is the server's
//! access policy, keyed by the bearer token.

use std::future::Future;

use reqwest::RequestBuilder;
use url::Url;

use marq_store::{Bookmark, BookmarkRepo, NewBookmark, StoreError, BOOKMARKS_TABLE};

use crate::config::RemoteConfig;
use crate::{Result, TokenCell, APIKEY_HEADER};

#[derive(Clone)]
pub struct RemoteBookmarks {
    http: reqwest::Client,
    rows_url: Url,
    anon_key: String,
    token: TokenCell,
}

impl RemoteBookmarks {
    pub(crate) fn new(http: reqwest::Client, config: &RemoteConfig, token: TokenCell) -> Result<Self> {
        Ok(Self {
            http,
            rows_url: config.endpoint(&["rest", "v1", BOOKMARKS_TABLE])?,
            anon_key: config.anon_key.clone(),
            token,
        })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(APIKEY_HEADER, &self.anon_key);
        match self.token.read().clone() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl BookmarkRepo for RemoteBookmarks {
    fn list_newest_first(
        &self,
    ) -> impl Future<Output = marq_store::Result<Vec<Bookmark>>> + Send {
        async move {
            let request = self.authed(
                self.http
                    .get(self.rows_url.clone())
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            );

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(StoreError::Rejected(format!("HTTP {}", response.status())));
            }

            response
                .json::<Vec<Bookmark>>()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))
        }
    }

    fn insert(&self, bookmark: NewBookmark) -> impl Future<Output = marq_store::Result<()>> + Send {
        async move {
            let request = self.authed(
                self.http
                    .post(self.rows_url.clone())
                    .header("prefer", "return=minimal")
                    .json(&bookmark),
            );

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(StoreError::Rejected(format!("HTTP {}", response.status())));
            }

            Ok(())
        }
    }

    fn delete(&self, id: &str) -> impl Future<Output = marq_store::Result<()>> + Send {
        async move {
            let request = self.authed(
                self.http
                    .delete(self.rows_url.clone())
                    .query(&[("id", &format!("eq.{id}"))]),
            );

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(StoreError::Rejected(format!("HTTP {}", response.status())));
            }

            Ok(())
        }
    }
}
