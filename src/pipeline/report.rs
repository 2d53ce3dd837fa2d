use crate::classify::ClassificationResult;
use crate::recommend::RecommendationText;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Composed result of one successful cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub classification: ClassificationResult,
    pub recommendation: RecommendationText,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(classification: ClassificationResult, recommendation: RecommendationText) -> Self {
        Self {
            classification,
            recommendation,
            analyzed_at: Utc::now(),
        }
    }
}
