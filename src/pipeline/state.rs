use serde::Serialize;
use std::fmt;

/// Where a session currently is in the upload → classify → recommend flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing uploaded
    Idle,
    /// An image is in the slot and waits for an explicit detect
    AwaitingUpload,
    Classifying,
    Recommending,
    /// Report cached; further detects return it without another call
    Complete,
    /// Last cycle failed; the image is kept so detect can be re-triggered
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::AwaitingUpload => "awaiting_upload",
            PipelineState::Classifying => "classifying",
            PipelineState::Recommending => "recommending",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, PipelineState::Classifying | PipelineState::Recommending)
    }

    /// True when `detect` would start a new cycle.
    pub fn can_detect(&self) -> bool {
        matches!(self, PipelineState::AwaitingUpload | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
