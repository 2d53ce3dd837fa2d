use crate::classify::ClassificationError;
use crate::recommend::RecommendationError;
use thiserror::Error;

/// Message shown for any failed analysis, whatever the cause
pub const ANALYSIS_FAILED_MESSAGE: &str = "Error analyzing image. Please try again later.";

#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("no image has been uploaded")]
    NotReady,

    #[error("an analysis is already in progress")]
    InFlight,

    /// The session was cleared or given a new image while this cycle ran
    #[error("analysis abandoned: the session was reset while it was running")]
    Abandoned,

    #[error("classification failed: {0}")]
    Classification(#[from] ClassificationError),

    #[error("recommendation failed: {0}")]
    Recommendation(#[from] RecommendationError),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NotReady => "not_ready",
            PipelineError::InFlight => "in_flight",
            PipelineError::Abandoned => "abandoned",
            PipelineError::Classification(e) => e.kind(),
            PipelineError::Recommendation(e) => e.kind(),
        }
    }

    /// Text for the person using the app
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::NotReady => "Please upload an image first.",
            PipelineError::InFlight => "Analysis already in progress.",
            PipelineError::Abandoned => "Analysis was cancelled.",
            PipelineError::Classification(_) | PipelineError::Recommendation(_) => {
                ANALYSIS_FAILED_MESSAGE
            }
        }
    }

    /// True for failures that move the session to `Failed`
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Classification(_) | PipelineError::Recommendation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failures_share_one_message() {
        let classify: PipelineError =
            ClassificationError::InitFailed("weights missing".to_string()).into();
        let recommend: PipelineError =
            RecommendationError::TransportFailed("offline".to_string()).into();

        assert_eq!(classify.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert_eq!(recommend.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert_ne!(classify.kind(), recommend.kind());
        assert!(classify.is_analysis_failure());
    }

    #[test]
    fn test_control_errors() {
        assert_eq!(PipelineError::InFlight.kind(), "in_flight");
        assert!(!PipelineError::Abandoned.is_analysis_failure());
        assert_ne!(PipelineError::NotReady.user_message(), ANALYSIS_FAILED_MESSAGE);
    }
}
