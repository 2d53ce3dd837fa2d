//! Upload validation and ingestion
//!
//! Turns a raw file from the upload surface into an [`ImageAsset`]:
//! authorization gate, extension and size policy, then an off-thread decode
//! that produces the data-URI preview.

mod asset;
mod auth;
mod error;
mod ingestor;

pub use asset::{ImageAsset, ImageFormat, MAX_UPLOAD_BYTES};
pub use auth::{AuthGate, StaticAuth};
pub use error::ValidationError;
pub use ingestor::{Ingested, Ingestor, UploadedFile};
