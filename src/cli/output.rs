//! Output formatting for multiple formats
//!
//! Reports, advice payloads and health results render as JSON, YAML or
//! human-readable text. Machine formats go to stdout untouched so they can be
//! piped; logs are on stderr.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pipeline::AnalysisReport;
use crate::recommend::AdviceResponse;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Formats the result of `cropsavvy analyze`
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize analysis report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize analysis report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    /// Formats the result of `cropsavvy advise`
    pub fn format_advice(&self, advice: &AdviceResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(advice)
                .context("Failed to serialize advice response to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(advice).context("Failed to serialize advice response to YAML")
            }
            OutputFormat::Human => Ok(advice.recommendations.clone()),
        }
    }

    pub fn format_health(&self, status: &HealthStatus) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(status)
                .context("Failed to serialize health status to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(status).context("Failed to serialize health status to YAML")
            }
            OutputFormat::Human => Ok(self.format_health_human(status)),
        }
    }

    pub fn format_models(&self, provider: &str, models: &[String]) -> Result<String> {
        let listing = ModelListing { provider, models };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&listing)
                .context("Failed to serialize model list to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&listing).context("Failed to serialize model list to YAML")
            }
            OutputFormat::Human => {
                let mut output = format!("Models for {} ({})\n", provider, models.len());
                for model in models {
                    output.push_str(&format!("  - {}\n", model));
                }
                Ok(output)
            }
        }
    }

    fn format_report_human(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();
        let classification = &report.classification;

        if classification.is_healthy() {
            output.push_str("\u{2713} Plant Analysis Result\n");
        } else {
            output.push_str("\u{26A0} Plant Analysis Result\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Disease:     {}\n", classification.disease()));

        let filled_blocks = (classification.confidence() as usize / 10).min(10);
        let confidence_bar =
            "\u{2588}".repeat(filled_blocks) + &"\u{2591}".repeat(10 - filled_blocks);
        output.push_str(&format!(
            "Confidence:  {} {}%\n\n",
            confidence_bar,
            classification.confidence()
        ));

        for section in report.recommendation.sections() {
            output.push_str(&section.title);
            output.push('\n');
            for line in &section.lines {
                output.push_str(&format!("  {}\n", line));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "Analyzed at {}\n",
            report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output
    }

    fn format_health_human(&self, status: &HealthStatus) -> String {
        let mut output = String::new();

        output.push_str("Advice Backend Health\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        let status_symbol = if status.available {
            "\u{2713}"
        } else {
            "\u{2717}"
        };
        output.push_str(&format!("{} {} ({})\n", status_symbol, status.provider, status.model));
        output.push_str(&format!(
            "  Status: {}\n",
            if status.available {
                "Available"
            } else {
                "Unavailable"
            }
        ));
        output.push_str(&format!("  Message: {}\n", status.message));
        if let Some(ms) = status.response_time_ms {
            output.push_str(&format!("  Response Time: {}ms\n", ms));
        }
        if let Some(ref details) = status.details {
            output.push_str(&format!("  Details: {}\n", details));
        }

        output
    }
}

#[derive(Serialize)]
struct ModelListing<'a> {
    provider: &'a str,
    models: &'a [String],
}

/// Result of `cropsavvy health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub provider: String,
    pub model: String,
    pub available: bool,
    pub message: String,
    pub details: Option<String>,
    pub response_time_ms: Option<u64>,
}

impl HealthStatus {
    pub fn available(provider: &str, model: &str, message: String) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            available: true,
            message,
            details: None,
            response_time_ms: None,
        }
    }

    pub fn unavailable(provider: &str, model: &str, message: String) -> Self {
        Self {
            available: false,
            ..Self::available(provider, model, message)
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}
