//! Logging-based pipeline observer

use super::{PipelineEvent, PipelineObserver};
use tracing::{debug, info, warn};

/// Observer that logs pipeline events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl PipelineObserver for LoggingHandler {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ImageReady {
                name,
                bytes,
                width,
                height,
            } => {
                info!(image = %name, bytes, width, height, "Image ready for analysis");
            }
            PipelineEvent::LoginRequired => {
                warn!("Please log in to upload images");
            }
            PipelineEvent::StateChanged { from, to } => {
                debug!(from = %from, to = %to, "Pipeline state changed");
            }
            PipelineEvent::ClassificationComplete {
                disease,
                confidence,
                duration,
            } => {
                info!(
                    disease = %disease,
                    confidence,
                    duration_ms = duration.as_millis(),
                    "Classification complete"
                );
            }
            PipelineEvent::RecommendationComplete { duration } => {
                info!(duration_ms = duration.as_millis(), "Analysis complete");
            }
            PipelineEvent::StaleResponseDiscarded { cycle, stage } => {
                debug!(cycle, stage, "Discarding result of an abandoned cycle");
            }
            PipelineEvent::Failed { kind, error } => {
                warn!(kind, error = %error, "Analysis failed");
            }
        }
    }
}
