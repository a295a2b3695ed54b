//! Remote change feed
//!
//! One long-lived request per feed: the backend keeps the response open and
//! writes one JSON change object per line. A reader task parses lines and
//! fans them out over a broadcast channel; subscriptions are just receivers.
//! The reader reconnects with a fixed delay (transport-level recovery,
//! distinct from request retries, which do not exist) and is aborted when
//! the feed is dropped.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use url::Url;

use marq_realtime::{ChangeEvent, ChangeFeed, Subscription};

use crate::config::RemoteConfig;
use crate::{Result, TokenCell, APIKEY_HEADER};

const EVENT_CAPACITY: usize = 64;
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct RemoteFeed {
    events: broadcast::Sender<ChangeEvent>,
    _reader: Arc<ReaderGuard>,
}

struct ReaderGuard {
    handle: JoinHandle<()>,
}

impl Drop for ReaderGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl RemoteFeed {
    /// Start the reader task for one table's change stream. Must be called
    /// within a tokio runtime.
    pub(crate) fn connect(
        http: reqwest::Client,
        config: &RemoteConfig,
        token: TokenCell,
        table: &str,
    ) -> Result<Self> {
        let url = Self::stream_url(config, table)?;
        let anon_key = config.anon_key.clone();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let tx = events.clone();
        let handle = tokio::spawn(async move {
            read_loop(http, url, anon_key, token, tx).await;
        });

        Ok(Self {
            events,
            _reader: Arc::new(ReaderGuard { handle }),
        })
    }

    fn stream_url(config: &RemoteConfig, table: &str) -> Result<Url> {
        let mut url = config.endpoint(&["realtime", "v1", "changes"])?;
        url.query_pairs_mut().append_pair("table", table);
        Ok(url)
    }
}

impl ChangeFeed for RemoteFeed {
    fn subscribe(&self) -> Subscription {
        Subscription::new(self.events.subscribe())
    }
}

async fn read_loop(
    http: reqwest::Client,
    url: Url,
    anon_key: String,
    token: TokenCell,
    tx: broadcast::Sender<ChangeEvent>,
) {
    loop {
        let request = {
            let request = http.get(url.clone()).header(APIKEY_HEADER, &anon_key);
            match token.read().clone() {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        };

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("change stream connected");
                stream_lines(response, &tx).await;
                tracing::debug!("change stream ended");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "change stream rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "change stream connect failed");
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn stream_lines(response: reqwest::Response, tx: &broadcast::Sender<ChangeEvent>) {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "change stream read failed");
                return;
            }
        };

        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(pos) = buffer.find('\n') {
            let line: String = buffer.drain(..=pos).collect();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match ChangeEvent::parse_line(line) {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unparseable change line");
                }
            }
        }
    }
}
