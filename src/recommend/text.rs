use crate::classify::ClassificationResult;
use serde::Serialize;
use std::fmt;

pub const HEALTHY_HEADLINE: &str = "Great news! Your plant appears to be healthy!";
pub const ADVICE_HEADING: &str = "AI Recommendations:";

/// Which headline the advice was framed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    DiseaseDetected,
    Healthy,
}

/// A block of consecutive non-blank lines; the first line is the title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

/// Advice text framed for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationText {
    framing: Framing,
    text: String,
}

impl RecommendationText {
    /// Wraps raw advice with the headline that matches the classification.
    pub fn frame(result: &ClassificationResult, advice: &str) -> Self {
        let advice = advice.trim();

        if result.is_healthy() {
            Self {
                framing: Framing::Healthy,
                text: format!("{}\n\n{}", HEALTHY_HEADLINE, advice),
            }
        } else {
            Self {
                framing: Framing::DiseaseDetected,
                text: format!(
                    "Disease Detected: {} ({}% confidence)\n\n{}\n{}",
                    result.disease(),
                    result.confidence(),
                    ADVICE_HEADING,
                    advice
                ),
            }
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// First line of the framed text
    pub fn headline(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }

    /// Splits the text on blank lines.
    ///
    /// Whitespace-only lines count as blank, so every returned section has a
    /// non-empty title.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for line in self.text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                sections.extend(current.take());
                continue;
            }

            match current.as_mut() {
                Some(section) => section.lines.push(line.to_string()),
                None => {
                    current = Some(Section {
                        title: line.trim().to_string(),
                        lines: Vec::new(),
                    })
                }
            }
        }
        sections.extend(current);

        sections
    }
}

impl fmt::Display for RecommendationText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
