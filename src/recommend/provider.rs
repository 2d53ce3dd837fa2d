use super::error::RecommendationError;
use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::wire::{AdviceRequest, AdviceResponse};
use crate::llm::{ChatMessage, LLMClient, LLMRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const ADVICE_TEMPERATURE: f32 = 0.4;
const ADVICE_MAX_TOKENS: u32 = 2048;

/// Remote procedure that turns a classification into advice text
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, request: &AdviceRequest) -> Result<AdviceResponse, RecommendationError>;

    fn name(&self) -> &str;
}

/// Advice generated by a text-generation backend from the fixed prompt
pub struct LlmAdviceProvider {
    client: Arc<dyn LLMClient>,
}

impl LlmAdviceProvider {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdviceProvider for LlmAdviceProvider {
    async fn advise(&self, request: &AdviceRequest) -> Result<AdviceResponse, RecommendationError> {
        if request.disease.trim().is_empty() {
            return Err(RecommendationError::RemoteError(
                "No disease provided".to_string(),
            ));
        }

        info!(
            disease = %request.disease,
            confidence = request.confidence,
            backend = self.client.name(),
            "Requesting recommendations"
        );

        let llm_request = LLMRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(&request.disease, request.confidence)),
        ])
        .with_temperature(ADVICE_TEMPERATURE)
        .with_max_tokens(ADVICE_MAX_TOKENS);

        let response = self.client.chat(llm_request).await?;

        debug!(
            chars = response.content.len(),
            elapsed_ms = response.response_time.as_millis() as u64,
            "Advice backend answered"
        );

        if response.is_blank() {
            return Err(RecommendationError::RemoteError(
                "advice backend returned an empty response".to_string(),
            ));
        }

        Ok(AdviceResponse::success(request, response.content.trim()))
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{BackendError, MessageRole, MockLLMClient, MockResponse};

    fn request(disease: &str) -> AdviceRequest {
        AdviceRequest {
            disease: disease.to_string(),
            confidence: 70,
        }
    }

    #[tokio::test]
    async fn test_sends_system_and_templated_prompt() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_response(MockResponse::text("1. Overview\nIt is a fungus."));
        let provider = LlmAdviceProvider::new(mock.clone());

        let response = provider.advise(&request("Early Blight")).await.unwrap();

        assert!(response.success);
        assert_eq!(response.disease, "Early Blight");
        assert!(!response.is_healthy);
        assert_eq!(response.recommendations, "1. Overview\nIt is a fungus.");

        let sent = mock.recorded_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].messages[0].role, MessageRole::System);
        let prompt = sent[0].last_user_message().unwrap();
        assert!(prompt.contains("\"Early Blight\""));
        assert!(prompt.contains("70%"));
        assert_eq!(sent[0].temperature, Some(ADVICE_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_empty_disease_is_rejected_without_call() {
        let mock = Arc::new(MockLLMClient::new());
        let provider = LlmAdviceProvider::new(mock.clone());

        let err = provider.advise(&request("  ")).await.unwrap_err();

        assert_eq!(err.kind(), "remote_error");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_reply_is_remote_error() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_response(MockResponse::text("   \n"));
        let provider = LlmAdviceProvider::new(mock);

        let err = provider.advise(&request("Rust")).await.unwrap_err();
        assert_eq!(err.kind(), "remote_error");
    }

    #[tokio::test]
    async fn test_backend_errors_are_mapped() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_response(MockResponse::error(BackendError::NetworkError {
            message: "connection reset".to_string(),
        }));
        mock.add_response(MockResponse::error(BackendError::AuthenticationError {
            message: "API key not valid".to_string(),
        }));
        let provider = LlmAdviceProvider::new(mock);

        let transport = provider.advise(&request("Rust")).await.unwrap_err();
        assert_eq!(transport.kind(), "transport_failed");

        let unconfigured = provider.advise(&request("Rust")).await.unwrap_err();
        assert_eq!(unconfigured.kind(), "unconfigured");
    }
}
