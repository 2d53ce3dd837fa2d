//! End-to-end pipeline tests through the public API
//!
//! These drive the orchestrator with scripted doubles:
//! - `FixedClassifier` for deterministic labels
//! - `MockLLMClient` behind `LlmAdviceProvider` for the remote call
//! - `StaticAuth` for the sign-in gate

use async_trait::async_trait;
use cropsavvy::classify::{ClassificationResult, DiseaseLabel, FixedClassifier};
use cropsavvy::ingest::{Ingestor, StaticAuth, UploadedFile, ValidationError};
use cropsavvy::llm::{BackendError, LLMClient, LLMRequest, LLMResponse, MockLLMClient, MockResponse};
use cropsavvy::pipeline::{
    Orchestrator, PipelineError, PipelineState, UploadOutcome, ANALYSIS_FAILED_MESSAGE,
};
use cropsavvy::progress::{NoOpHandler, PipelineEvent, PipelineObserver};
use cropsavvy::recommend::{Framing, LlmAdviceProvider, RecommendationStage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

fn encoded(format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(24, 24, image::Rgb([40, 150, 60]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode test image");
    buf
}

fn leaf_png() -> UploadedFile {
    UploadedFile::from_bytes("leaf.png", encoded(image::ImageFormat::Png))
}

fn leaf_jpg() -> UploadedFile {
    UploadedFile::from_bytes("leaf.jpg", encoded(image::ImageFormat::Jpeg))
}

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<PipelineEvent>>,
}

impl PipelineObserver for EventLog {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl EventLog {
    fn stale_discards(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, PipelineEvent::StaleResponseDiscarded { .. }))
            .count()
    }
}

fn orchestrator_with(
    auth: Arc<StaticAuth>,
    classifier: Arc<FixedClassifier>,
    llm: Arc<dyn LLMClient>,
    observer: Arc<dyn PipelineObserver>,
) -> Arc<Orchestrator> {
    Arc::new(Orchestrator::new(
        Ingestor::new(auth),
        classifier,
        RecommendationStage::new(Arc::new(LlmAdviceProvider::new(llm))),
        observer,
    ))
}

#[tokio::test]
async fn test_unauthenticated_upload_fires_login_hook() {
    let auth = Arc::new(StaticAuth::guest());
    let classifier = Arc::new(FixedClassifier::new());
    let llm = Arc::new(MockLLMClient::new());
    let events = Arc::new(EventLog::default());
    let orchestrator = orchestrator_with(auth.clone(), classifier, llm.clone(), events.clone());

    let outcome = orchestrator.upload(leaf_png()).await.unwrap();

    assert!(matches!(outcome, UploadOutcome::LoginRequired));
    assert_eq!(auth.login_prompts(), 1);
    assert_eq!(orchestrator.state(), PipelineState::Idle);
    assert!(orchestrator.asset().is_none());
    assert_eq!(llm.call_count(), 0);
    assert_eq!(
        events.events.lock().unwrap().as_slice(),
        &[PipelineEvent::LoginRequired]
    );
}

#[tokio::test]
async fn test_authenticated_jpeg_runs_to_complete() {
    let classifier = Arc::new(FixedClassifier::new());
    classifier.push_ok(ClassificationResult::new(DiseaseLabel::EarlyBlight, 70));
    let llm = Arc::new(MockLLMClient::new());
    llm.add_response(MockResponse::text(
        "1. Overview\nEarly blight is a common fungal disease.\n\n9. Summary\n- Remove infected leaves",
    ));
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        classifier.clone(),
        llm.clone(),
        Arc::new(NoOpHandler),
    );

    orchestrator.upload(leaf_jpg()).await.unwrap();
    assert_eq!(orchestrator.state(), PipelineState::AwaitingUpload);
    assert!(classifier.classified().is_empty());

    let report = orchestrator.detect().await.unwrap();

    assert_eq!(report.classification.disease(), DiseaseLabel::EarlyBlight);
    assert_eq!(report.classification.confidence(), 70);
    assert!(!report.classification.is_healthy());
    assert_eq!(orchestrator.state(), PipelineState::Complete);

    let requests = llm.recorded_requests();
    assert_eq!(requests.len(), 1);
    let prompt = requests[0].last_user_message().unwrap();
    assert!(prompt.contains("\"Early Blight\""));
    assert!(prompt.contains("Detection confidence: 70%"));

    assert_eq!(report.recommendation.framing(), Framing::DiseaseDetected);
    assert!(report
        .recommendation
        .as_str()
        .starts_with("Disease Detected: Early Blight (70% confidence)"));
}

#[tokio::test]
async fn test_gif_rejected_without_state_change() {
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        Arc::new(FixedClassifier::new()),
        Arc::new(MockLLMClient::new()),
        Arc::new(NoOpHandler),
    );

    let err = orchestrator
        .upload(UploadedFile::from_bytes("leaf.gif", encoded(image::ImageFormat::Png)))
        .await
        .unwrap_err();

    assert!(matches!(err, ValidationError::UnsupportedFormat { .. }));
    assert_eq!(orchestrator.state(), PipelineState::Idle);
    assert!(orchestrator.asset().is_none());
}

#[tokio::test]
async fn test_transport_error_fails_then_clear_discards_everything() {
    let classifier = Arc::new(FixedClassifier::new());
    classifier.push_ok(ClassificationResult::new(DiseaseLabel::LateBlight, 70));
    let llm = Arc::new(MockLLMClient::new());
    llm.add_response(MockResponse::error(BackendError::NetworkError {
        message: "connection refused".to_string(),
    }));
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        classifier,
        llm,
        Arc::new(NoOpHandler),
    );

    orchestrator.upload(leaf_png()).await.unwrap();
    let err = orchestrator.detect().await.unwrap_err();

    assert!(err.is_analysis_failure());
    assert_eq!(err.kind(), "transport_failed");
    assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
    assert_eq!(orchestrator.state(), PipelineState::Failed);
    assert!(orchestrator.report().is_none());
    assert_eq!(
        orchestrator.classification().map(|c| c.disease()),
        Some(DiseaseLabel::LateBlight)
    );

    orchestrator.clear();

    assert_eq!(orchestrator.state(), PipelineState::Idle);
    assert!(orchestrator.classification().is_none());
    assert!(orchestrator.asset().is_none());
    assert!(orchestrator.report().is_none());
}

#[tokio::test]
async fn test_retry_keeps_the_label_for_the_same_photo() {
    let classifier = Arc::new(FixedClassifier::new());
    classifier
        .push_ok(ClassificationResult::new(DiseaseLabel::Rust, 70))
        .push_ok(ClassificationResult::new(DiseaseLabel::Healthy, 70));
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses([
        MockResponse::error(BackendError::NetworkError {
            message: "connection refused".to_string(),
        }),
        MockResponse::text("1. Overview\nRust forms orange pustules."),
    ]);
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        classifier.clone(),
        llm.clone(),
        Arc::new(NoOpHandler),
    );

    orchestrator.upload(leaf_png()).await.unwrap();
    orchestrator.detect().await.unwrap_err();
    let report = orchestrator.detect().await.unwrap();

    assert_eq!(classifier.classified().len(), 1);
    assert_eq!(report.classification.disease(), DiseaseLabel::Rust);
    assert!(report
        .recommendation
        .as_str()
        .starts_with("Disease Detected: Rust (70% confidence)"));
    assert_eq!(llm.call_count(), 2);
}

/// Answers only once the test lets it go
struct GatedClient {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl LLMClient for GatedClient {
    async fn chat(&self, _request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(LLMResponse::text(
            "1. Overview\nToo late to matter.",
            Duration::from_millis(5),
        ))
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[tokio::test]
async fn test_clear_during_recommending_discards_late_success() {
    let classifier = Arc::new(FixedClassifier::new());
    classifier.push_ok(ClassificationResult::new(DiseaseLabel::Rust, 70));
    let gate = Arc::new(GatedClient {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let events = Arc::new(EventLog::default());
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        classifier,
        gate.clone(),
        events.clone(),
    );

    orchestrator.upload(leaf_png()).await.unwrap();

    let running = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.detect().await })
    };

    gate.entered.notified().await;
    assert_eq!(orchestrator.state(), PipelineState::Recommending);
    assert!(!orchestrator.can_detect());

    orchestrator.clear();
    assert_eq!(orchestrator.state(), PipelineState::Idle);

    gate.release.notify_one();
    let result = running.await.unwrap();

    assert!(matches!(result, Err(PipelineError::Abandoned)));
    assert_eq!(orchestrator.state(), PipelineState::Idle);
    assert!(orchestrator.report().is_none());
    assert!(orchestrator.classification().is_none());
    assert_eq!(events.stale_discards(), 1);
}

#[tokio::test]
async fn test_new_upload_during_recommending_replaces_slot() {
    let classifier = Arc::new(FixedClassifier::new());
    classifier
        .push_ok(ClassificationResult::new(DiseaseLabel::Rust, 70))
        .push_ok(ClassificationResult::new(DiseaseLabel::Healthy, 70));
    let gate = Arc::new(GatedClient {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let orchestrator = orchestrator_with(
        Arc::new(StaticAuth::authenticated()),
        classifier,
        gate.clone(),
        Arc::new(NoOpHandler),
    );

    orchestrator.upload(leaf_png()).await.unwrap();
    let running = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.detect().await })
    };
    gate.entered.notified().await;

    let outcome = orchestrator.upload(leaf_jpg()).await.unwrap();
    assert!(matches!(outcome, UploadOutcome::Accepted(_)));

    gate.release.notify_one();
    assert!(matches!(
        running.await.unwrap(),
        Err(PipelineError::Abandoned)
    ));

    assert_eq!(orchestrator.state(), PipelineState::AwaitingUpload);
    assert_eq!(
        orchestrator.asset().map(|a| a.name().to_string()),
        Some("leaf.jpg".to_string())
    );
    assert!(orchestrator.can_detect());
}
