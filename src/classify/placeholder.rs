//! Placeholder classifier
//!
//! This is NOT real inference. The image is preprocessed and pushed through a
//! randomly initialized scoring head so the input path is exercised end to end,
//! but the label comes from a uniform random draw mapped through fixed
//! probability bands, and the confidence is a constant. Swapping in a trained
//! model means replacing [`select_label`] and the head; the [`Classifier`]
//! contract stays the same.

use super::error::ClassificationError;
use super::label::{ClassificationResult, DiseaseLabel};
use super::preprocess::{preprocess, INPUT_CHANNELS};
use super::Classifier;
use crate::ingest::ImageAsset;
use async_trait::async_trait;
use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::OnceCell;
use tokio::task;
use tracing::{debug, info};

/// Confidence reported for every placeholder prediction
pub const PLACEHOLDER_CONFIDENCE: u8 = 70;

/// Upper bounds (exclusive) of the cumulative probability bands.
const LABEL_BANDS: [(f64, DiseaseLabel); 7] = [
    (0.15, DiseaseLabel::Healthy),
    (0.30, DiseaseLabel::EarlyBlight),
    (0.45, DiseaseLabel::LateBlight),
    (0.60, DiseaseLabel::LeafSpot),
    (0.75, DiseaseLabel::PowderyMildew),
    (0.90, DiseaseLabel::Rust),
    (1.00, DiseaseLabel::BacterialSpot),
];

/// Maps a draw in `[0, 1)` to a label.
pub fn select_label(draw: f64) -> DiseaseLabel {
    LABEL_BANDS
        .iter()
        .find(|(upper, _)| draw < *upper)
        .map(|(_, label)| *label)
        .unwrap_or(DiseaseLabel::BacterialSpot)
}

/// Global average pool followed by a 3×7 projection and softmax.
#[derive(Clone)]
struct ScoringHead {
    weights: Tensor,
}

impl ScoringHead {
    fn load(device: &Device) -> candle_core::Result<Self> {
        let weights = Tensor::randn(
            0f32,
            0.02f32,
            (INPUT_CHANNELS, DiseaseLabel::ALL.len()),
            device,
        )?;
        Ok(Self { weights })
    }

    fn forward(&self, input: &Tensor) -> candle_core::Result<Vec<f32>> {
        let pooled = input.mean((1, 2))?;
        let logits = pooled.matmul(&self.weights)?;
        let shifted = logits.broadcast_sub(&logits.max_keepdim(1)?)?;
        let exp = shifted.exp()?;
        let probs = exp.broadcast_div(&exp.sum_keepdim(1)?)?;
        probs.squeeze(0)?.to_vec1::<f32>()
    }
}

pub struct PlaceholderClassifier {
    device: Device,
    head: OnceCell<ScoringHead>,
    loads: AtomicUsize,
    rng: Mutex<StdRng>,
}

impl PlaceholderClassifier {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible label sequence for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            device: Device::Cpu,
            head: OnceCell::new(),
            loads: AtomicUsize::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Sets up the scoring head on first call; later calls return immediately.
    pub async fn ensure_initialized(&self) -> Result<(), ClassificationError> {
        self.head_handle().await.map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.head.initialized()
    }

    /// How many times the expensive setup actually ran
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn head_handle(&self) -> Result<&ScoringHead, ClassificationError> {
        self.head
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                info!("Loading placeholder scoring head");
                ScoringHead::load(&self.device)
                    .map_err(|e| ClassificationError::InitFailed(e.to_string()))
            })
            .await
    }

    fn draw(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random::<f64>()
    }
}

impl Default for PlaceholderClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for PlaceholderClassifier {
    async fn classify(
        &self,
        asset: &ImageAsset,
    ) -> Result<ClassificationResult, ClassificationError> {
        let head = self.head_handle().await?.clone();
        let bytes = asset.bytes().clone();
        let device = self.device.clone();

        // Input and score tensors live only inside this closure.
        let scores = task::spawn_blocking(move || {
            let input = preprocess(&bytes, &device)?;
            head.forward(&input)
                .map_err(|e| ClassificationError::BadInput(format!("forward pass failed: {}", e)))
        })
        .await
        .map_err(|e| ClassificationError::BadInput(format!("classification task failed: {}", e)))??;

        debug!(file = asset.name(), ?scores, "Scoring head output (unused by placeholder)");

        let disease = select_label(self.draw());
        let result = ClassificationResult::new(disease, PLACEHOLDER_CONFIDENCE);

        info!(
            file = asset.name(),
            disease = %result.disease(),
            confidence = result.confidence(),
            "Placeholder classification complete"
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

impl std::fmt::Debug for PlaceholderClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderClassifier")
            .field("initialized", &self.is_initialized())
            .field("load_count", &self.load_count())
            .finish()
    }
}
