//! Failure taxonomy for the Twitter pipeline.

use thiserror::Error;
use tweetfetch_http::HttpError;

/// Everything a fetch can fail with.
///
/// `Clone` so one in-flight token request can hand the same failure to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwitterError {
    /// Missing API key or secret. Raised before any network activity.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The token endpoint refused us or answered with something unusable.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A paginated request came back with a non-200 status.
    #[error("fetch failed with status {status}: {body}")]
    Fetch { status: u16, body: String },

    /// A page was not JSON, or lacked the fields needed to build a tweet.
    #[error("parse error: {0}")]
    Parse(String),

    /// The network layer itself failed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl TwitterError {
    /// Map a transport failure raised while paginating.
    pub(crate) fn from_fetch(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => Self::Fetch { status, body },
            other => Self::Transport(other.to_string()),
        }
    }

    /// Map a transport failure raised while talking to the token endpoint.
    pub(crate) fn from_auth(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => {
                Self::Authentication(format!("token endpoint returned {status}: {body}"))
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TwitterError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result type for Twitter operations.
pub type TwitterResult<T> = Result<T, TwitterError>;
