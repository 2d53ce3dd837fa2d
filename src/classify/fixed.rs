use super::error::ClassificationError;
use super::label::ClassificationResult;
use super::Classifier;
use crate::ingest::ImageAsset;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Scripted classifier: outcomes are returned in the order they were queued.
pub struct FixedClassifier {
    outcomes: Mutex<VecDeque<Result<ClassificationResult, ClassificationError>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl FixedClassifier {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleeps for `delay` before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_ok(&self, result: ClassificationResult) -> &Self {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner).push_back(Ok(result));
        self
    }

    pub fn push_err(&self, error: ClassificationError) -> &Self {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner).push_back(Err(error));
        self
    }

    /// Names of the assets classified so far
    pub fn classified(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(
        &self,
        asset: &ImageAsset,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(asset.name().to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        next.unwrap_or_else(|| {
            Err(ClassificationError::InitFailed(
                "FixedClassifier: no scripted outcome left".to_string(),
            ))
        })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
