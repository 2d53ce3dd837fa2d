use crate::classify::ClassificationResult;
use serde::{Deserialize, Serialize};

/// Payload sent to the advice backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub disease: String,
    pub confidence: u8,
}

impl From<&ClassificationResult> for AdviceRequest {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            disease: result.disease().to_string(),
            confidence: result.confidence(),
        }
    }
}

/// Payload returned by the advice backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub success: bool,
    pub disease: String,
    pub confidence: u8,
    pub recommendations: String,
    #[serde(rename = "isHealthy")]
    pub is_healthy: bool,
}

impl AdviceResponse {
    pub fn success(request: &AdviceRequest, recommendations: impl Into<String>) -> Self {
        Self {
            success: true,
            disease: request.disease.clone(),
            confidence: request.confidence,
            recommendations: recommendations.into(),
            is_healthy: request.disease.eq_ignore_ascii_case("healthy"),
        }
    }
}
