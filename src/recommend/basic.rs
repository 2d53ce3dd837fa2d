//! Canned advice that needs no network access.

use super::error::RecommendationError;
use super::provider::AdviceProvider;
use super::wire::{AdviceRequest, AdviceResponse};
use async_trait::async_trait;
use tracing::info;

struct CannedAdvice {
    overview: &'static str,
    actions: [&'static str; 4],
    prevention: [&'static str; 4],
}

const EARLY_BLIGHT: CannedAdvice = CannedAdvice {
    overview: "Early blight is a common fungal disease affecting tomatoes and potatoes.",
    actions: [
        "Remove affected leaves immediately",
        "Improve air circulation",
        "Apply copper-based fungicide",
        "Water at soil level, not on leaves",
    ],
    prevention: [
        "Rotate crops annually",
        "Use disease-resistant varieties",
        "Maintain proper spacing",
        "Remove plant debris",
    ],
};

const LATE_BLIGHT: CannedAdvice = CannedAdvice {
    overview: "Late blight is a serious fungal disease that can destroy entire crops quickly.",
    actions: [
        "Remove infected plants immediately",
        "Apply fungicide preventively",
        "Improve drainage",
        "Avoid overhead watering",
    ],
    prevention: [
        "Plant certified disease-free seeds",
        "Ensure good air circulation",
        "Monitor weather conditions",
        "Remove volunteer plants",
    ],
};

const LEAF_SPOT: CannedAdvice = CannedAdvice {
    overview: "Leaf spot diseases cause circular spots on leaves, reducing plant vigor.",
    actions: [
        "Remove spotted leaves",
        "Apply organic fungicide",
        "Reduce humidity around plants",
        "Improve soil drainage",
    ],
    prevention: [
        "Space plants properly",
        "Water early morning",
        "Use mulch to prevent soil splash",
        "Choose resistant varieties",
    ],
};

const POWDERY_MILDEW: CannedAdvice = CannedAdvice {
    overview: "Powdery mildew appears as white powdery coating on leaves.",
    actions: [
        "Spray with baking soda solution",
        "Improve air circulation",
        "Remove affected parts",
        "Apply sulfur-based fungicide",
    ],
    prevention: [
        "Avoid overcrowding plants",
        "Plant in sunny locations",
        "Water at soil level",
        "Choose resistant cultivars",
    ],
};

const HEALTHY: CannedAdvice = CannedAdvice {
    overview: "Your plant appears healthy! Continue good care practices.",
    actions: [
        "Monitor regularly for changes",
        "Maintain consistent watering",
        "Ensure proper nutrition",
        "Keep area clean",
    ],
    prevention: [
        "Continue current care routine",
        "Watch for early disease signs",
        "Maintain plant hygiene",
        "Provide adequate spacing",
    ],
};

const IMPORTANT_NOTES: [&str; 4] = [
    "Monitor your plants daily for changes",
    "Consult local agricultural experts for severe cases",
    "This is AI-generated advice for educational purposes",
    "Always follow local agricultural guidelines",
];

fn lookup(disease: &str) -> &'static CannedAdvice {
    match disease {
        "Early Blight" => &EARLY_BLIGHT,
        "Late Blight" => &LATE_BLIGHT,
        "Powdery Mildew" => &POWDERY_MILDEW,
        "Healthy" => &HEALTHY,
        // Leaf Spot doubles as the fallback for labels without an entry
        _ => &LEAF_SPOT,
    }
}

fn bullets(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the canned advice for one disease.
pub fn basic_recommendations(disease: &str, confidence: u8) -> String {
    let info = lookup(disease);

    format!(
        "Disease: {disease}\nConfidence: {confidence}%\n\n\
         Overview\n{}\n\n\
         Immediate Actions\n{}\n\n\
         Prevention Tips\n{}\n\n\
         Important Notes\n{}",
        info.overview,
        bullets(&info.actions),
        bullets(&info.prevention),
        bullets(&IMPORTANT_NOTES),
    )
}

/// Offline provider backed by a fixed table
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicAdviceProvider;

impl BasicAdviceProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AdviceProvider for BasicAdviceProvider {
    async fn advise(&self, request: &AdviceRequest) -> Result<AdviceResponse, RecommendationError> {
        if request.disease.trim().is_empty() {
            return Err(RecommendationError::RemoteError(
                "No disease provided".to_string(),
            ));
        }

        info!(
            disease = %request.disease,
            confidence = request.confidence,
            "Getting canned recommendations"
        );

        let text = basic_recommendations(&request.disease, request.confidence);
        Ok(AdviceResponse::success(request, text))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
