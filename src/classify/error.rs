use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    /// The underlying model could not be set up
    #[error("classifier initialization failed: {0}")]
    InitFailed(String),

    /// The image could not be decoded or turned into model input
    #[error("image could not be classified: {0}")]
    BadInput(String),
}

impl ClassificationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassificationError::InitFailed(_) => "init_failed",
            ClassificationError::BadInput(_) => "bad_input",
        }
    }
}
