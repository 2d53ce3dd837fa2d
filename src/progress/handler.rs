//! Pipeline observer trait and events

use crate::classify::DiseaseLabel;
use crate::pipeline::PipelineState;
use std::time::Duration;

/// Events emitted while a session moves through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// An upload passed validation and now occupies the slot
    ImageReady {
        name: String,
        bytes: usize,
        width: u32,
        height: u32,
    },

    /// Upload refused because the caller is not signed in
    LoginRequired,

    /// The session moved to a new state
    StateChanged {
        from: PipelineState,
        to: PipelineState,
    },

    /// Classifier produced a label
    ClassificationComplete {
        disease: DiseaseLabel,
        confidence: u8,
        duration: Duration,
    },

    /// Advice text arrived and the report was cached
    RecommendationComplete { duration: Duration },

    /// A result arrived for a cycle that was cleared or replaced
    StaleResponseDiscarded { cycle: u64, stage: &'static str },

    /// Classification or recommendation failed
    Failed { kind: &'static str, error: String },
}

/// Receives pipeline events; implementations re-render or log.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Observer that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl PipelineObserver for NoOpHandler {
    fn on_event(&self, _event: &PipelineEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl PipelineObserver for CountingHandler {
        fn on_event(&self, _event: &PipelineEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_event(&PipelineEvent::LoginRequired);
    }

    #[test]
    fn test_observer_receives_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_event(&PipelineEvent::StateChanged {
            from: PipelineState::Idle,
            to: PipelineState::AwaitingUpload,
        });
        handler.on_event(&PipelineEvent::ClassificationComplete {
            disease: DiseaseLabel::Rust,
            confidence: 70,
            duration: Duration::from_millis(12),
        });
        handler.on_event(&PipelineEvent::RecommendationComplete {
            duration: Duration::from_secs(2),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = PipelineEvent::StaleResponseDiscarded {
            cycle: 3,
            stage: "recommend",
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("StaleResponseDiscarded"));
        assert!(debug_str.contains("cycle: 3"));
    }
}
