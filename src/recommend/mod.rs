//! Recommendation stage
//!
//! Sends `{disease, confidence}` to an [`AdviceProvider`] exactly once and
//! frames the returned text for display.

mod basic;
mod error;
mod prompt;
mod provider;
mod stage;
mod text;
mod wire;

pub use basic::{basic_recommendations, BasicAdviceProvider};
pub use error::RecommendationError;
pub use prompt::{build_prompt, HEALTH_CHECK_PROMPT, SECTION_TITLES, SYSTEM_PROMPT};
pub use provider::{AdviceProvider, LlmAdviceProvider};
pub use stage::{RecommendationStage, DEFAULT_RECOMMENDATION_TIMEOUT};
pub use text::{Framing, RecommendationText, Section, ADVICE_HEADING, HEALTHY_HEADLINE};
pub use wire::{AdviceRequest, AdviceResponse};
