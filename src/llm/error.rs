//! Failures reported by an [`LLMClient`](super::LLMClient)
//!
//! The advice layer only needs to tell three things apart: the call never got
//! an answer, the credentials are wrong, or the backend answered with an error.
//! [`BackendError::is_transport`] and [`BackendError::is_credentials`] make that
//! split; everything else counts as a remote error.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    /// The backend answered with an error status
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    AuthenticationError { message: String },

    /// No answer within the client's deadline
    TimeoutError { seconds: u64 },

    RateLimitError { retry_after: Option<u64> },

    /// Missing key, empty model name or unusable endpoint
    ConfigurationError { message: String },

    /// Connection refused, DNS failure, reset
    NetworkError { message: String },

    Other { message: String },
}

impl BackendError {
    /// True when the backend never produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BackendError::NetworkError { .. } | BackendError::TimeoutError { .. }
        )
    }

    /// True when the key is missing or was refused.
    pub fn is_credentials(&self) -> bool {
        match self {
            BackendError::AuthenticationError { .. } | BackendError::ConfigurationError { .. } => {
                true
            }
            BackendError::ApiError { status_code, .. } => matches!(status_code, Some(401 | 403)),
            _ => false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code: Some(code),
            } => write!(f, "advice backend returned {}: {}", code, message),
            BackendError::ApiError { message, .. } => {
                write!(f, "advice backend error: {}", message)
            }
            BackendError::AuthenticationError { message } => {
                write!(f, "advice backend rejected the credentials: {}", message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "advice backend did not answer within {}s", seconds)
            }
            BackendError::RateLimitError {
                retry_after: Some(seconds),
            } => write!(f, "advice backend is rate limiting, retry in {}s", seconds),
            BackendError::RateLimitError { retry_after: None } => {
                f.write_str("advice backend is rate limiting")
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "advice backend misconfigured: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "could not reach the advice backend: {}", message)
            }
            BackendError::Other { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for BackendError {}
