//! Structured logging setup
//!
//! Logs go to stderr so that `--format json` output on stdout stays parseable.
//! The subscriber is installed once per process; later calls are ignored.
//!
//! ```no_run
//! use cropsavvy::util::logging;
//!
//! // CROPSAVVY_LOG_LEVEL=debug CROPSAVVY_LOG_JSON=true
//! logging::init_from_env();
//! tracing::info!(image = "leaf.png", "Image ready for analysis");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Crates that are noisy at info level
const QUIET_DEPENDENCIES: [&str; 4] = ["h2=warn", "hyper=warn", "reqwest=warn", "genai=warn"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's own events
    pub level: Level,

    /// One JSON object per line instead of human-readable text
    pub use_json: bool,

    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `CROPSAVVY_LOG_LEVEL` and `CROPSAVVY_LOG_JSON`.
    pub fn from_env() -> Self {
        let level = env::var("CROPSAVVY_LOG_LEVEL")
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("CROPSAVVY_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a level name, case-insensitively.
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Ok(directive) = format!("cropsavvy={}", level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    // RUST_LOG, when set, decides about dependencies
    if env::var("RUST_LOG").is_err() {
        for quiet in QUIET_DEPENDENCIES {
            if let Ok(directive) = quiet.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    filter
}

pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
