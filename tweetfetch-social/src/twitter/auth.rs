//! Application-only OAuth2: trade the API key/secret for a bearer token.
//!
//! The token is cached for the lifetime of the [`Authenticator`]. It is never
//! refreshed; a revoked or expired token surfaces as a fetch failure.
//!
//! Concurrent callers that arrive before the first token is known share one
//! in-flight request and all observe its outcome. A failed request leaves the
//! cache empty so the next caller starts over.
use std::fmt;
use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::Deserialize;
use tweetfetch_http::{HeaderMap, HeaderValue, HttpClient, Method, basic_header};

use crate::twitter::encode::encode_component;
use crate::twitter::error::{TwitterError, TwitterResult};

pub(crate) const TOKEN_PATH: &str = "/oauth2/token";
const TOKEN_BODY: &str = "grant_type=client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// API key and secret. Both required.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reject blank values before anything touches the network.
    pub fn validate(&self) -> TwitterResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(TwitterError::Configuration("apiKey is mandatory".into()));
        }
        if self.api_secret.trim().is_empty() {
            return Err(TwitterError::Configuration("apiSecret is mandatory".into()));
        }
        Ok(())
    }

    /// `base64(encode(key) ":" encode(secret))`
    fn basic_credential(&self) -> String {
        let joined = format!(
            "{}:{}",
            encode_component(&self.api_key),
            encode_component(&self.api_secret)
        );
        BASE64.encode(joined)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

type TokenFuture = Shared<BoxFuture<'static, TwitterResult<String>>>;

enum TokenSlot {
    Unset,
    Pending(TokenFuture),
    Ready(String),
}

pub struct Authenticator {
    credentials: Credentials,
    http: HttpClient,
    slot: Arc<Mutex<TokenSlot>>,
}

impl Authenticator {
    pub fn new(credentials: Credentials, http: HttpClient) -> TwitterResult<Self> {
        credentials.validate()?;
        Ok(Self {
            credentials,
            http,
            slot: Arc::new(Mutex::new(TokenSlot::Unset)),
        })
    }

    /// The bearer token, fetched on first use and cached afterwards.
    pub async fn token(&self) -> TwitterResult<String> {
        let pending = {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            match &*slot {
                TokenSlot::Ready(token) => return Ok(token.clone()),
                TokenSlot::Pending(fut) => fut.clone(),
                TokenSlot::Unset => {
                    let fut = request_token(self.http.clone(), self.credentials.clone())
                        .boxed()
                        .shared();
                    *slot = TokenSlot::Pending(fut.clone());
                    fut
                }
            }
        };

        let outcome = pending.clone().await;

        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        // Only the request that is still current may settle the slot.
        if matches!(&*slot, TokenSlot::Pending(current) if current.ptr_eq(&pending)) {
            *slot = match &outcome {
                Ok(token) => TokenSlot::Ready(token.clone()),
                Err(_) => TokenSlot::Unset,
            };
        }
        outcome
    }

    /// Whether a token is cached.
    pub fn has_token(&self) -> bool {
        matches!(
            &*self.slot.lock().unwrap_or_else(|e| e.into_inner()),
            TokenSlot::Ready(_)
        )
    }
}

async fn request_token(http: HttpClient, credentials: Credentials) -> TwitterResult<String> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        basic_header(&credentials.basic_credential())
            .map_err(|e| TwitterError::Authentication(e.to_string()))?,
    );
    headers.insert("content-type", HeaderValue::from_static(FORM_CONTENT_TYPE));

    tracing::debug!("twitter.auth.token_request");
    let body = http
        .send(Method::POST, TOKEN_PATH, headers, TOKEN_BODY.to_string())
        .await
        .map_err(TwitterError::from_auth)?;

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| TwitterError::Authentication(format!("unreadable token response: {e}")))?;
    let token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            TwitterError::Authentication("token response has no access_token".into())
        })?;

    tracing::debug!("twitter.auth.token_acquired");
    Ok(token)
}
