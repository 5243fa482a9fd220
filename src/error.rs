//! Mimir error types

use std::path::PathBuf;
use std::time::Duration;

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Service/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The service answered 404 for a classifier.
    ///
    /// Shortly after creation this is the service's visibility race, not a
    /// real absence; see [`is_visibility_race()`](Self::is_visibility_race).
    #[error("classifier not found: {0}")]
    ClassifierNotFound(String),

    // Local errors
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Job errors
    /// A training job reached the `failed` state and the run is configured
    /// to abort on job failure.
    #[error("training failed for {name} ({classifier_id}): {explanation}")]
    TrainingFailed {
        classifier_id: String,
        name: String,
        explanation: String,
    },

    #[error("empty response from service")]
    EmptyResponse,
}

impl MimirError {
    /// Build an [`Io`](Self::Io) error tagged with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MimirError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is worth retrying at the transport level.
    ///
    /// Network failures, rate limiting and 5xx responses are transient.
    /// Everything else (auth, 4xx, local I/O, job failure) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            MimirError::Http(_) | MimirError::RateLimited { .. } => true,
            MimirError::Api { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Whether a status query failed with the post-creation not-found race.
    ///
    /// The poller treats this as "still pending"; it is never surfaced.
    pub fn is_visibility_race(&self) -> bool {
        matches!(self, MimirError::ClassifierNotFound(_))
    }

    /// Provider hint for how long to wait before retrying, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MimirError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
