use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of labels the classifier can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseLabel {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Early Blight")]
    EarlyBlight,
    #[serde(rename = "Late Blight")]
    LateBlight,
    #[serde(rename = "Leaf Spot")]
    LeafSpot,
    #[serde(rename = "Powdery Mildew")]
    PowderyMildew,
    #[serde(rename = "Rust")]
    Rust,
    #[serde(rename = "Bacterial Spot")]
    BacterialSpot,
}

impl DiseaseLabel {
    pub const ALL: [DiseaseLabel; 7] = [
        DiseaseLabel::Healthy,
        DiseaseLabel::EarlyBlight,
        DiseaseLabel::LateBlight,
        DiseaseLabel::LeafSpot,
        DiseaseLabel::PowderyMildew,
        DiseaseLabel::Rust,
        DiseaseLabel::BacterialSpot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseLabel::Healthy => "Healthy",
            DiseaseLabel::EarlyBlight => "Early Blight",
            DiseaseLabel::LateBlight => "Late Blight",
            DiseaseLabel::LeafSpot => "Leaf Spot",
            DiseaseLabel::PowderyMildew => "Powdery Mildew",
            DiseaseLabel::Rust => "Rust",
            DiseaseLabel::BacterialSpot => "Bacterial Spot",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, DiseaseLabel::Healthy)
    }
}

impl fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseLabel {
    type Err = String;

    /// Accepts the display name in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        DiseaseLabel::ALL
            .into_iter()
            .find(|label| label.as_str().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = DiseaseLabel::ALL.iter().map(|l| l.as_str()).collect();
                format!("unknown disease '{}'. Valid options: {}", s, valid.join(", "))
            })
    }
}

/// One label plus an integer confidence for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    disease: DiseaseLabel,
    confidence: u8,
    is_healthy: bool,
}

impl ClassificationResult {
    /// Confidence is a percentage; values above 100 are clamped.
    pub fn new(disease: DiseaseLabel, confidence: u8) -> Self {
        Self {
            disease,
            confidence: confidence.min(100),
            is_healthy: disease.is_healthy(),
        }
    }

    pub fn disease(&self) -> DiseaseLabel {
        self.disease
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_seven_labels() {
        let unique: std::collections::HashSet<_> = DiseaseLabel::ALL.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn test_from_str_variants() {
        assert_eq!(
            "early blight".parse::<DiseaseLabel>().unwrap(),
            DiseaseLabel::EarlyBlight
        );
        assert_eq!(
            "Powdery-Mildew".parse::<DiseaseLabel>().unwrap(),
            DiseaseLabel::PowderyMildew
        );
        assert_eq!(
            "bacterial_spot".parse::<DiseaseLabel>().unwrap(),
            DiseaseLabel::BacterialSpot
        );
        assert!("Blossom End Rot".parse::<DiseaseLabel>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for label in DiseaseLabel::ALL {
            assert_eq!(label.to_string().parse::<DiseaseLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_serializes_display_name() {
        let json = serde_json::to_string(&DiseaseLabel::LateBlight).unwrap();
        assert_eq!(json, "\"Late Blight\"");
    }

    #[test]
    fn test_result_derives_health_flag() {
        assert!(ClassificationResult::new(DiseaseLabel::Healthy, 70).is_healthy());
        assert!(!ClassificationResult::new(DiseaseLabel::Rust, 70).is_healthy());
    }

    #[test]
    fn test_result_clamps_confidence() {
        let result = ClassificationResult::new(DiseaseLabel::LeafSpot, 250);
        assert_eq!(result.confidence(), 100);
    }

    #[test]
    fn test_result_json_shape() {
        let result = ClassificationResult::new(DiseaseLabel::EarlyBlight, 70);
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"disease": "Early Blight", "confidence": 70, "isHealthy": false})
        );
    }
}
