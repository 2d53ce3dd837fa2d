use super::asset::{ImageAsset, ImageFormat, MAX_UPLOAD_BYTES};
use super::auth::AuthGate;
use super::error::ValidationError;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, warn};

/// A file handed over by the upload surface, not yet read or validated.
#[derive(Debug, Clone)]
pub enum UploadedFile {
    InMemory { name: String, bytes: Bytes },
    OnDisk { path: PathBuf },
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        UploadedFile::InMemory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        UploadedFile::OnDisk { path: path.into() }
    }

    pub fn name(&self) -> String {
        match self {
            UploadedFile::InMemory { name, .. } => name.clone(),
            UploadedFile::OnDisk { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    async fn size(&self, name: &str) -> Result<u64, ValidationError> {
        match self {
            UploadedFile::InMemory { bytes, .. } => Ok(bytes.len() as u64),
            UploadedFile::OnDisk { path } => tokio::fs::metadata(path)
                .await
                .map(|m| m.len())
                .map_err(|e| ValidationError::DecodeFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    async fn into_bytes(self, name: &str) -> Result<Bytes, ValidationError> {
        match self {
            UploadedFile::InMemory { bytes, .. } => Ok(bytes),
            UploadedFile::OnDisk { path } => tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|e| ValidationError::DecodeFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}

/// Result of an ingestion attempt that was not rejected
#[derive(Debug)]
pub enum Ingested {
    Ready(ImageAsset),
    /// The caller is not signed in; the login hook has fired and nothing was read.
    LoginRequired,
}

/// Validates uploads and turns them into decoded [`ImageAsset`]s
pub struct Ingestor {
    auth: Arc<dyn AuthGate>,
    max_bytes: u64,
}

impl Ingestor {
    pub fn new(auth: Arc<dyn AuthGate>) -> Self {
        Self {
            auth,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    pub async fn ingest(&self, file: UploadedFile) -> Result<Ingested, ValidationError> {
        if !self.auth.is_authenticated() {
            self.auth.login_required();
            return Ok(Ingested::LoginRequired);
        }

        let name = file.name();

        let format = ImageFormat::from_file_name(&name).ok_or_else(|| {
            warn!(file = %name, "Rejected upload with unsupported extension");
            ValidationError::UnsupportedFormat { name: name.clone() }
        })?;

        let size = file.size(&name).await?;
        if size > self.max_bytes {
            warn!(file = %name, size, limit = self.max_bytes, "Rejected oversized upload");
            return Err(ValidationError::TooLarge {
                name,
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = file.into_bytes(&name).await?;
        // The file may have grown between the metadata check and the read.
        if bytes.len() as u64 > self.max_bytes {
            return Err(ValidationError::TooLarge {
                name,
                size: bytes.len() as u64,
                limit: self.max_bytes,
            });
        }

        let decode_input = bytes.clone();
        let (width, height) = task::spawn_blocking(move || {
            image::load_from_memory(&decode_input).map(|img| (img.width(), img.height()))
        })
        .await
        .map_err(|e| ValidationError::DecodeFailed {
            name: name.clone(),
            reason: e.to_string(),
        })?
        .map_err(|e| ValidationError::DecodeFailed {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        debug!(file = %name, width, height, "Decoded upload");

        let asset = ImageAsset::new(name, format, bytes, width, height);
        info!(
            file = asset.name(),
            format = %asset.format(),
            bytes = asset.len(),
            sha256 = asset.sha256(),
            "Image ready for analysis"
        );

        Ok(Ingested::Ready(asset))
    }
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}
