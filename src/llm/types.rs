//! Provider-neutral request and response shapes

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// One prompt exchange. Unset sampling options use the provider's defaults.
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LLMRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The prompt actually sent by the caller, i.e. the most recent user turn
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    /// Wall time of the call, as measured by the client
    pub response_time: Duration,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>, response_time: Duration) -> Self {
        Self {
            content: content.into(),
            response_time,
        }
    }

    /// No usable text: empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles() {
        assert_eq!(ChatMessage::system("rules").role, MessageRole::System);
        assert_eq!(ChatMessage::user("leaf").role, MessageRole::User);
        assert_eq!(ChatMessage::assistant("advice").role, MessageRole::Assistant);
        assert_eq!(ChatMessage::user("leaf").content, "leaf");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("x")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
    }

    #[test]
    fn test_request_options() {
        let request = LLMRequest::new(vec![ChatMessage::user("Late Blight")]);
        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());

        let request = request.with_temperature(0.4).with_max_tokens(2048);
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.max_tokens, Some(2048));
    }

    #[test]
    fn test_last_user_message() {
        let request = LLMRequest::new(vec![
            ChatMessage::system("rules"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ]);
        assert_eq!(request.last_user_message(), Some("second"));

        let empty = LLMRequest::new(vec![ChatMessage::system("rules")]);
        assert_eq!(empty.last_user_message(), None);
    }

    #[test]
    fn test_blank_response() {
        assert!(LLMResponse::text("  \n", Duration::from_millis(5)).is_blank());
        assert!(!LLMResponse::text("1. Overview", Duration::from_millis(100)).is_blank());
    }
}
