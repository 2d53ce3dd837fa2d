use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
pub struct MockResponse {
    outcome: Result<String, BackendError>,
    delay: Option<Duration>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            outcome: Ok(content.into()),
            delay: None,
        }
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    /// Sleeps for `delay` before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Scripted client for tests and demos.
///
/// Replies are served in the order they were queued; every request is kept so
/// tests can assert on the prompt. An empty queue answers with an error.
pub struct MockLLMClient {
    script: Mutex<VecDeque<MockResponse>>,
    received: Mutex<Vec<LLMRequest>>,
    name: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::with_name("mock")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        lock(&self.script).push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        lock(&self.script).extend(responses);
    }

    pub fn remaining_responses(&self) -> usize {
        lock(&self.script).len()
    }

    /// Requests received so far, oldest first
    pub fn recorded_requests(&self) -> Vec<LLMRequest> {
        lock(&self.received).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.received).len()
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        lock(&self.received).push(request);

        let next = lock(&self.script).pop_front();
        let Some(reply) = next else {
            return Err(BackendError::Other {
                message: format!("{}: no scripted reply left", self.name),
            });
        };

        let elapsed = reply.delay.unwrap_or(Duration::from_millis(1));
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        reply
            .outcome
            .map(|content| LLMResponse::text(content, elapsed))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("scripted".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLLMClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}
