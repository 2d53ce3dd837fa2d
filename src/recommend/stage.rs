use super::error::RecommendationError;
use super::provider::AdviceProvider;
use super::text::RecommendationText;
use super::wire::AdviceRequest;
use crate::classify::ClassificationResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_RECOMMENDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns a classification into framed advice with one provider call.
pub struct RecommendationStage {
    provider: Arc<dyn AdviceProvider>,
    timeout: Duration,
}

impl RecommendationStage {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_RECOMMENDATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn recommend(
        &self,
        result: &ClassificationResult,
    ) -> Result<RecommendationText, RecommendationError> {
        let request = AdviceRequest::from(result);
        let start = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.provider.advise(&request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(RecommendationError::TransportFailed(format!(
                "no answer within {}s",
                self.timeout.as_secs()
            ))),
        };

        let response = outcome.and_then(|response| {
            if !response.success {
                Err(RecommendationError::RemoteError(
                    "backend reported failure".to_string(),
                ))
            } else if response.recommendations.trim().is_empty() {
                Err(RecommendationError::RemoteError(
                    "backend returned no recommendations".to_string(),
                ))
            } else {
                Ok(response)
            }
        });

        match response {
            Ok(response) => {
                info!(
                    provider = self.provider.name(),
                    disease = %request.disease,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Recommendations received"
                );
                Ok(RecommendationText::frame(result, &response.recommendations))
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    kind = e.kind(),
                    error = %e,
                    "Recommendation call failed"
                );
                Err(e)
            }
        }
    }
}
