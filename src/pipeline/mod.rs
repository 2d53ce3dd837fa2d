//! Session orchestration
//!
//! `Idle → AwaitingUpload → Classifying → Recommending → Complete`, with
//! `Failed` reachable from either stage and `clear` returning to `Idle` from
//! anywhere.

mod error;
mod orchestrator;
mod report;
mod session;
mod state;

pub use error::{PipelineError, ANALYSIS_FAILED_MESSAGE};
pub use orchestrator::{Orchestrator, UploadOutcome};
pub use report::AnalysisReport;
pub use session::SessionSnapshot;
pub use state::PipelineState;
