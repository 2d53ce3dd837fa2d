use thiserror::Error;

/// Reasons an upload is rejected before it reaches the pipeline
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported image format for '{name}': expected .jpg, .jpeg, .png or .webp")]
    UnsupportedFormat { name: String },

    #[error("'{name}' is {size} bytes, uploads are limited to {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("failed to decode '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },
}

impl ValidationError {
    /// Short identifier used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedFormat { .. } => "unsupported_format",
            ValidationError::TooLarge { .. } => "too_large",
            ValidationError::DecodeFailed { .. } => "decode_failed",
        }
    }

    /// Message shown to the person uploading
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedFormat { .. } => {
                "Please upload a valid image format: JPG, JPEG, PNG, or WEBP"
            }
            ValidationError::TooLarge { .. } => "File size must be less than 10MB",
            ValidationError::DecodeFailed { .. } => {
                "The image could not be read. Please try a different file."
            }
        }
    }
}
