//! Classification stage
//!
//! Assigns one disease label and an integer confidence to an ingested image.
//! The shipped [`PlaceholderClassifier`] does not perform real inference; see
//! its module docs.

mod error;
mod fixed;
mod label;
mod placeholder;
mod preprocess;

pub use error::ClassificationError;
pub use fixed::FixedClassifier;
pub use label::{ClassificationResult, DiseaseLabel};
pub use placeholder::{select_label, PlaceholderClassifier, PLACEHOLDER_CONFIDENCE};
pub use preprocess::{preprocess, INPUT_CHANNELS, INPUT_SIZE};

use crate::ingest::ImageAsset;
use async_trait::async_trait;

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, asset: &ImageAsset)
        -> Result<ClassificationResult, ClassificationError>;

    fn name(&self) -> &str;
}
