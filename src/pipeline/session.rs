//! Single-slot session owned by the orchestrator

use super::error::PipelineError;
use super::report::AnalysisReport;
use super::state::PipelineState;
use crate::classify::ClassificationResult;
use crate::ingest::ImageAsset;
use serde::Serialize;
use uuid::Uuid;

/// Everything the pipeline remembers about the current image
#[derive(Debug)]
pub(crate) struct Session {
    pub id: Uuid,
    pub state: PipelineState,
    pub asset: Option<ImageAsset>,
    pub classification: Option<ClassificationResult>,
    pub report: Option<AnalysisReport>,
    pub last_failure: Option<PipelineError>,
    /// Bumped whenever the slot is emptied or replaced. A cycle whose number no
    /// longer matches must not write back.
    pub cycle: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: PipelineState::Idle,
            asset: None,
            classification: None,
            report: None,
            last_failure: None,
            cycle: 0,
        }
    }

    /// Moves to `to` and returns the previous state.
    pub fn transition(&mut self, to: PipelineState) -> PipelineState {
        std::mem::replace(&mut self.state, to)
    }

    /// Drops the image and all results, returns to `Idle` and detaches any
    /// cycle still running. Returns the previous state.
    pub fn reset(&mut self) -> PipelineState {
        self.asset = None;
        self.classification = None;
        self.report = None;
        self.last_failure = None;
        self.cycle += 1;
        self.transition(PipelineState::Idle)
    }

    pub fn is_current(&self, cycle: u64) -> bool {
        self.cycle == cycle
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            state: self.state,
            image: self.asset.as_ref().map(|a| a.name().to_string()),
            classification: self.classification,
            has_report: self.report.is_some(),
            last_error: self.last_failure.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Read-only view of the session for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: PipelineState,
    pub image: Option<String>,
    pub classification: Option<ClassificationResult>,
    pub has_report: bool,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DiseaseLabel;
    use crate::ingest::ImageFormat;

    #[test]
    fn test_reset_clears_slot_and_bumps_cycle() {
        let mut session = Session::new();
        session.asset = Some(ImageAsset::undecoded("leaf.png", ImageFormat::Png, vec![0]));
        session.classification = Some(ClassificationResult::new(DiseaseLabel::Rust, 70));
        session.state = PipelineState::Failed;
        let cycle = session.cycle;

        let previous = session.reset();

        assert_eq!(previous, PipelineState::Failed);
        assert_eq!(session.state, PipelineState::Idle);
        assert!(session.asset.is_none());
        assert!(session.classification.is_none());
        assert!(!session.is_current(cycle));
    }

    #[test]
    fn test_snapshot() {
        let mut session = Session::new();
        session.asset = Some(ImageAsset::undecoded("leaf.jpg", ImageFormat::Jpeg, vec![0]));
        session.transition(PipelineState::AwaitingUpload);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, PipelineState::AwaitingUpload);
        assert_eq!(snapshot.image.as_deref(), Some("leaf.jpg"));
        assert!(!snapshot.has_report);
        assert_eq!(snapshot.id, session.id);
    }
}
