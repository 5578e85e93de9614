//! Error types for service calls.

use thiserror::Error;

/// Errors from talking to the external services.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service responded {status}: {message}")]
    Service { status: u16, message: String },

    /// The response body was not in the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The request was rejected locally before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// User-facing text. Service messages are passed through unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Could not reach the service. Please check your connection and try again."
                    .to_string()
            }
            Self::Service { message, .. } => message.clone(),
            Self::Decode(_) => "The service sent a response that could not be read.".to_string(),
            Self::InvalidRequest(message) => message.clone(),
        }
    }

    /// Whether retrying the same call could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Service { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::InvalidRequest(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<breath_model::ModelError> for ClientError {
    fn from(err: breath_model::ModelError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// Result type alias for service calls.
pub type Result<T> = std::result::Result<T, ClientError>;
