//! cropsavvy - crop disease triage from a plant photo
//!
//! A single analysis cycle runs three stages in order: an image is uploaded
//! and screened, a classifier assigns one of seven disease labels, and a
//! text-generation backend writes educational care advice for that label.
//! The [`pipeline::Orchestrator`] owns the session state machine that sequences
//! the stages and discards results that arrive after the user has moved on.
//!
//! # Core Concepts
//!
//! - **Ingestion**: Extension and size screening of uploads, gated on sign-in
//! - **Classification**: A pluggable [`classify::Classifier`]; the shipped one is
//!   a placeholder that picks a label at random with fixed confidence
//! - **Recommendation**: An [`recommend::AdviceProvider`] backed by any `genai`
//!   provider, or an offline table of canned advice
//! - **Orchestration**: `Idle -> AwaitingUpload -> Classifying -> Recommending ->
//!   Complete`, with `Failed` on stage errors
//!
//! # Example Usage
//!
//! ```ignore
//! use cropsavvy::classify::PlaceholderClassifier;
//! use cropsavvy::ingest::{Ingestor, StaticAuth, UploadedFile};
//! use cropsavvy::progress::NoOpHandler;
//! use cropsavvy::recommend::{BasicAdviceProvider, RecommendationStage};
//! use cropsavvy::Orchestrator;
//! use std::sync::Arc;
//!
//! async fn triage(file: UploadedFile) -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(
//!         Ingestor::new(Arc::new(StaticAuth::authenticated())),
//!         Arc::new(PlaceholderClassifier::new()),
//!         RecommendationStage::new(Arc::new(BasicAdviceProvider)),
//!         Arc::new(NoOpHandler),
//!     );
//!
//!     orchestrator.upload(file).await?;
//!     let report = orchestrator.detect().await?;
//!     println!("{}", report.recommendation);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`ingest`]: Upload screening and the sign-in gate
//! - [`classify`]: Disease labels, preprocessing and classifiers
//! - [`llm`]: Provider-agnostic chat client over `genai`
//! - [`recommend`]: Prompting, advice providers and result framing
//! - [`pipeline`]: Session state machine and orchestrator
//! - [`progress`]: Observer events emitted by the orchestrator
//! - [`cli`]: Command-line surface

pub mod classify;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod recommend;
pub mod util;

pub use classify::{ClassificationError, ClassificationResult, Classifier, DiseaseLabel};
pub use config::{ConfigError, CropSavvyConfig, ProviderChoice};
pub use ingest::{ImageAsset, ValidationError};
pub use llm::{BackendError, LLMClient};
pub use pipeline::{AnalysisReport, Orchestrator, PipelineError, PipelineState, UploadOutcome};
pub use recommend::{RecommendationError, RecommendationText};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_cropsavvy() {
        assert_eq!(NAME, "cropsavvy");
    }
}
