//! Minimal HTTP GET transport anchored to a base URL.
//!
//! - Request options: query params and a per-request timeout
//! - Returns the response body as text for *any* HTTP status — the remote
//!   APIs we talk to signal errors inside the payload, so payload-level
//!   error detection stays with the caller
//! - No retries: a transport failure surfaces immediately
//! - Optional raw response logging via `SKIMMER_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), skimmer_http::HttpError> {
//! let client = skimmer_http::HttpClient::new("https://api.example.com/")?;
//! let body = client
//!     .get_text("v1/items", skimmer_http::RequestOpts::default())
//!     .await?;
//! # let _ = body; Ok(()) }
//! ```
//!
//! Structured `tracing` events are emitted for request start
//! (`http.request.start`), the response (`http.response`), non-success
//! statuses (`http.response.error_status`), and transport failures. Raw
//! bodies go to the `http.raw` target when enabled.

use std::borrow::Cow;
use std::env;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

const RAW_ENV: &str = "SKIMMER_HTTP_RAW";
const RAW_MAX_BODY: usize = 16 * 1024;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Per-request tuning knobs.
///
/// ```
/// use skimmer_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("q", "term".into())]),
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// The base should carry a trailing slash when it has a path component,
    /// so that relative endpoint paths join underneath it.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Issue one GET and return the response body as text.
    ///
    /// Query pairs from `opts` are appended in order and percent-encoded.
    /// The body is returned whatever the HTTP status; the status is logged,
    /// never mapped to an error.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut rb = self.inner.get(url.clone()).timeout(timeout);
        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        tracing::debug!(
            method = "GET",
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            query = ?opts.query,
            timeout_ms = timeout.as_millis() as u64,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|e| {
            tracing::warn!(error = %e, "http.network_error.send");
            HttpError::Network(e.to_string())
        })?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "http.network_error.body");
            HttpError::Network(e.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            "http.response"
        );

        if raw_enabled() {
            let mut snip = bytes.clone();
            let truncated = snip.len() > RAW_MAX_BODY;
            if truncated {
                snip.truncate(RAW_MAX_BODY);
            }
            tracing::info!(
                target: "http.raw",
                status = %status,
                duration_ms = dur_ms,
                body = %String::from_utf8_lossy(&snip),
                truncated,
                "response"
            );
        }

        if !status.is_success() {
            tracing::warn!(
                %status,
                body_snippet = %snip_body(&bytes),
                "http.response.error_status"
            );
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}
