use crate::llm::BackendError;
use thiserror::Error;

/// Failures of the remote advice call.
///
/// Callers treat every variant the same way; the split exists for logs.
#[derive(Debug, Clone, Error)]
pub enum RecommendationError {
    /// The backend could not be reached or did not answer in time
    #[error("advice backend unreachable: {0}")]
    TransportFailed(String),

    /// The backend answered with an error or an unusable payload
    #[error("advice backend returned an error: {0}")]
    RemoteError(String),

    /// Credentials are missing or were rejected
    #[error("advice backend is not configured: {0}")]
    Unconfigured(String),
}

impl RecommendationError {
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationError::TransportFailed(_) => "transport_failed",
            RecommendationError::RemoteError(_) => "remote_error",
            RecommendationError::Unconfigured(_) => "unconfigured",
        }
    }
}

impl From<BackendError> for RecommendationError {
    fn from(err: BackendError) -> Self {
        if err.is_transport() {
            RecommendationError::TransportFailed(err.to_string())
        } else if err.is_credentials() {
            RecommendationError::Unconfigured(err.to_string())
        } else {
            RecommendationError::RemoteError(err.to_string())
        }
    }
}
