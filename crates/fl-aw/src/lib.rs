//! Client for the local activity-logging service.
//!
//! Speaks the ActivityWatch REST API (`/api/0`): server info, window-event
//! queries over a time period, and raw bucket reads. Events come back as
//! [`fl_core::RawEvent`]s ready for aggregation.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fl_core::RawEvent;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Where a locally running activity service listens by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5600/api/0";

/// Id prefix of the buckets written by the window watcher.
pub const DEFAULT_BUCKET_PREFIX: &str = "aw-watcher-window_";

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Activity service client errors.
#[derive(Debug, Error)]
pub enum AwError {
    /// The configured base URL is unusable.
    #[error("invalid server URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Server returned a non-success status.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Identity of the activity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub hostname: String,
    pub version: String,
    #[serde(default)]
    pub testing: bool,
}

/// Activity service client.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    bucket_prefix: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("bucket_prefix", &self.bucket_prefix)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the service rooted at `base_url`
    /// (e.g. [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty, unparsable or not http(s), or
    /// if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, AwError> {
        let base_url = parse_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(AwError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            bucket_prefix: DEFAULT_BUCKET_PREFIX.to_string(),
        })
    }

    /// Uses `prefix` to locate the window bucket in [`Client::window_events`].
    #[must_use]
    pub fn with_bucket_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bucket_prefix = prefix.into();
        self
    }

    /// The service root this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetches the server's identity.
    pub async fn info(&self) -> Result<ServerInfo, AwError> {
        let url = self.endpoint(&["info"]);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Fetches window-focus events in `[start, end)` from the first bucket
    /// whose id starts with the configured prefix.
    pub async fn window_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>, AwError> {
        let request = QueryRequest {
            timeperiods: vec![format_period(start, end)],
            query: build_window_query(&self.bucket_prefix),
        };
        debug!(period = %request.timeperiods[0], "querying window events");

        let url = self.endpoint(&["query"]);
        let response = self.http.post(url).json(&request).send().await?;
        let mut periods: Vec<Vec<RawEvent>> = read_json(response).await?;

        let events = if periods.is_empty() {
            Vec::new()
        } else {
            periods.swap_remove(0)
        };
        debug!(count = events.len(), "fetched window events");
        Ok(events)
    }

    /// Reads the events of one bucket between `start` and `end`.
    pub async fn bucket_events(
        &self,
        bucket_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>, AwError> {
        let url = self.endpoint(&["buckets", bucket_id, "events"]);
        let response = self
            .http
            .get(url)
            .query(&[("start", start.to_rfc3339()), ("end", end.to_rfc3339())])
            .send()
            .await?;
        let events: Vec<RawEvent> = read_json(response).await?;
        debug!(bucket = bucket_id, count = events.len(), "fetched bucket events");
        Ok(events)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated to be http(s), which always have a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    timeperiods: Vec<String>,
    query: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_base_url(raw: &str) -> Result<Url, AwError> {
    let invalid = |reason: &str| AwError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL cannot be empty"));
    }
    let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    Ok(url)
}

/// Query statements selecting the window bucket's events. The period is
/// applied by the server through `timeperiods`.
fn build_window_query(bucket_prefix: &str) -> Vec<String> {
    // A JSON string literal is also a valid query-language string literal.
    let prefix = serde_json::Value::String(bucket_prefix.to_string());
    vec![
        format!("events = query_bucket(find_bucket({prefix}));"),
        "RETURN = sort_by_timestamp(events);".to_string(),
    ]
}

fn format_period(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{}/{}", start.to_rfc3339(), end.to_rfc3339())
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AwError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AwError::Api {
            status: status.as_u16(),
            message: parse_error_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(|err| AwError::InvalidResponse(err.to_string()))
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        },
        |parsed| parsed.message,
    )
}
