//! Minimal HTTP plumbing for the tweet fetcher: a transport seam plus a thin caller.
//!
//! - [`Transport`]: `request(method, path, headers, body) -> (status, body)`; moves bytes only
//! - [`ReqwestTransport`]: the production transport, anchored to a base URL
//! - [`HttpClient`]: fills `Content-Length` / `User-Agent` and turns any non-200 into
//!   [`HttpError::Status`] carrying the full response body
//! - Optional *raw* request/response logging via `TWEETFETCH_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), tweetfetch_http::HttpError> {
//! use std::sync::Arc;
//! use tweetfetch_http::{HeaderMap, HttpClient, Method, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new("https://api.twitter.com")?;
//! let client = HttpClient::new(Arc::new(transport));
//! let body = client
//!     .send(Method::GET, "/1.1/help/configuration.json", HeaderMap::new(), String::new())
//!     .await?;
//! # let _ = body;
//! # Ok(()) }
//! ```
//!
//! Security: `Authorization` header values and secret-looking query params are
//! redacted from every log line, including the raw curl rendering.
//!
//! There are no retries anywhere in this crate: a failure is surfaced immediately.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, USER_AGENT};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use reqwest::Method;
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// User agent sent when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = "TweetFetcher";

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "TWEETFETCH_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: &str) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if !body.is_empty() {
        let mut s = body.to_string();
        if s.len() > RAW_MAX_BODY {
            s.truncate(floor_char_boundary(&s, RAW_MAX_BODY));
            s.push('…');
        }
        parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
    }
    let (host_path, query) = redact_query(url);
    let rendered_query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    if rendered_query.is_empty() {
        parts.push(format!("'{}://{}'", url.scheme(), host_path));
    } else {
        parts.push(format!("'{}://{}?{}'", url.scheme(), host_path, rendered_query));
    }
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
                // keep the scheme so Basic vs Bearer stays visible
                let scheme = val.split_whitespace().next().unwrap_or("").to_string();
                val = format!("{scheme} <redacted>");
            }
            (key, val)
        })
        .collect()
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    // Return "host + path" string and redacted query list for logging
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = if is_secret_param(&k) {
                "<redacted>".to_string()
            } else {
                v.to_string()
            };
            (k, v)
        })
        .collect::<Vec<_>>();
    (host_path, redacted)
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    /// Any status other than 200. `body` is the untouched response body.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },
}

// ==============================
// Transport contract
// ==============================

/// One outgoing call. `path` is the absolute path plus query string.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The network capability the fetcher calls through.
///
/// Implementations report every status code as a successful [`HttpResponse`];
/// only failures of the network itself are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// `reqwest`-backed [`Transport`] anchored to a base URL.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    base: Url,
    inner: Client,
    pub timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Construct a transport anchored to a base URL.
    ///
    /// ```no_run
    /// use tweetfetch_http::{HttpError, ReqwestTransport};
    ///
    /// let transport = ReqwestTransport::new("https://api.twitter.com")?;
    /// assert!(transport.timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            timeout: None,
        })
    }

    /// Bound every call made through this transport. Unbounded by default.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = req;
        let url = self
            .base
            .join(&path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let (host_path, redacted_q) = redact_query(&url);
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            headers=?redact_headers(&headers),
            body_len=body.len(),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers, &body);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let mut rb = self
            .inner
            .request(method, url)
            .headers(headers)
            .body(body);
        if let Some(timeout) = self.timeout {
            rb = rb.timeout(timeout);
        }

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let limit = resp_headers
            .get("x-rate-limit-limit")
            .and_then(|v| v.to_str().ok());
        let remain = resp_headers
            .get("x-rate-limit-remaining")
            .and_then(|v| v.to_str().ok());
        let reset = resp_headers
            .get("x-rate-limit-reset")
            .and_then(|v| v.to_str().ok());

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            rate_limit.limit=?limit,
            rate_limit.remaining=?remain,
            rate_limit.reset=?reset,
            "http.response.headers"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let shown = &bytes[..bytes.len().min(RAW_MAX_BODY)];
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&resp_headers),
                body=%String::from_utf8_lossy(shown),
                truncated
            );
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

// ==============================
// Client
// ==============================

/// The caller every API request goes through.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    user_agent: String,
}

impl HttpClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Override the `User-Agent` used when a request does not carry one.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Issue one request and return the body of a 200 response.
    ///
    /// `Content-Length` and `User-Agent` are added when the caller did not set
    /// them. Every other status comes back as [`HttpError::Status`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        mut headers: HeaderMap,
        body: String,
    ) -> Result<String, HttpError> {
        if !headers.contains_key(CONTENT_LENGTH) {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
        if !headers.contains_key(USER_AGENT) {
            let ua = HeaderValue::from_str(&self.user_agent)
                .map_err(|e| HttpError::Build(format!("invalid User-Agent header: {e}")))?;
            headers.insert(USER_AGENT, ua);
        }

        let response = self
            .transport
            .request(HttpRequest {
                method: method.clone(),
                path: path.to_string(),
                headers,
                body,
            })
            .await?;

        if response.status != 200 {
            tracing::warn!(
                %method,
                status = response.status,
                message = %extract_error_message(response.body.as_bytes()),
                body_snippet = %snip_body(response.body.as_bytes()),
                "http.error"
            );
            return Err(HttpError::Status {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }
}

// ==============================
// Auth header helpers
// ==============================

/// `Authorization: Bearer <token>`. The token is sent exactly as issued.
pub fn bearer_header(token: &str) -> Result<HeaderValue, HttpError> {
    check_token(token)?;
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))
}

/// `Authorization: Basic <credential>` for an already-encoded credential.
pub fn basic_header(encoded: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))
}

/// Tokens are visible ASCII without quotes; anything else was mangled on the way.
fn check_token(token: &str) -> Result<(), HttpError> {
    if token.is_empty() {
        return Err(HttpError::Build("bearer token is empty".into()));
    }
    if !token.is_ascii() {
        return Err(HttpError::Build("bearer token contains non-ASCII bytes".into()));
    }
    if let Some(b) = token
        .bytes()
        .find(|b| !b.is_ascii_graphic() || *b == b'"' || *b == b'\'')
    {
        return Err(HttpError::Build(format!(
            "bearer token contains forbidden byte 0x{b:02x}"
        )));
    }
    Ok(())
}

// ==============================
// Helpers
// ==============================

/// Best-effort human message out of a platform error body.
pub fn extract_error_message(body: &[u8]) -> String {
    // {"errors":[{"code":89,"message":"Invalid or expired token."}]}
    #[derive(Deserialize)]
    struct Errors {
        errors: Vec<ErrorItem>,
    }
    #[derive(Deserialize)]
    struct ErrorItem {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
    }

    // {"error":"..."} or {"message":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(errs) = serde_json::from_slice::<Errors>(body) {
        if let Some(first) = errs.errors.into_iter().next() {
            if !first.message.is_empty() {
                return first.message;
            }
            if !first.detail.is_empty() {
                return first.detail;
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(floor_char_boundary(&snip, 500));
        snip.push_str("...");
    }
    snip
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut idx = max.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
