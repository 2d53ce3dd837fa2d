//! Pipeline event observers

mod handler;
mod logging;

pub use handler::{NoOpHandler, PipelineEvent, PipelineObserver};
pub use logging::LoggingHandler;
