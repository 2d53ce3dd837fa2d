use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

/// A text-generation backend: one prompt in, one text out.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    /// Provider name for logs and health output
    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;
    use std::sync::Arc;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl LLMClient for Echo {
        async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
            let prompt = request.last_user_message().unwrap_or_default();
            Ok(LLMResponse::text(prompt, Duration::from_millis(1)))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let client: Arc<dyn LLMClient> = Arc::new(Echo);
        assert_eq!(client.name(), "echo");
        assert!(client.model_info().is_none());

        let response = client
            .chat(LLMRequest::new(vec![ChatMessage::user("Powdery Mildew")]))
            .await
            .unwrap();
        assert_eq!(response.content, "Powdery Mildew");
    }
}
