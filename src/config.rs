//! Startup configuration for cropsavvy
//!
//! Settings are read once from environment variables with defaults; CLI flags
//! override them. Credentials are checked here, at startup, so a missing key
//! is reported before any image is processed.
//!
//! # Environment Variables
//!
//! - `CROPSAVVY_PROVIDER`: advice backend (gemini|openai|claude|ollama|groq|grok|offline) - default: "gemini"
//! - `CROPSAVVY_MODEL`: model name - default depends on the provider
//! - `CROPSAVVY_REQUEST_TIMEOUT`: advice call timeout in seconds - default: "30"
//! - `CROPSAVVY_LOG_LEVEL`: logging level - default: "info"
//! - `CROPSAVVY_API_BASE_URL`: custom endpoint for the provider (proxies, gateways)
//!
//! Provider credentials use the variables genai reads: `GEMINI_API_KEY`,
//! `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GROQ_API_KEY`, `XAI_API_KEY`.
//! Ollama and the offline provider need none.
//!
//! # Example
//!
//! ```no_run
//! use cropsavvy::CropSavvyConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CropSavvyConfig::default();
//! config.validate()?;
//! let provider = config.create_advice_provider()?;
//! # Ok(())
//! # }
//! ```

use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::recommend::{AdviceProvider, BasicAdviceProvider, LlmAdviceProvider};
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: gemini, openai, claude, ollama, groq, grok, offline")]
    InvalidProvider(String),

    #[error("Missing credentials for {provider}: set the {env_var} environment variable")]
    MissingCredentials { provider: String, env_var: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// Which backend produces the advice text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    /// A hosted or local LLM reached through genai
    Remote(AdapterKind),
    /// The canned table; no network access
    Offline,
}

impl ProviderChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderChoice::Remote(AdapterKind::Gemini) => "gemini",
            ProviderChoice::Remote(AdapterKind::OpenAI) => "openai",
            ProviderChoice::Remote(AdapterKind::Anthropic) => "claude",
            ProviderChoice::Remote(AdapterKind::Ollama) => "ollama",
            ProviderChoice::Remote(AdapterKind::Groq) => "groq",
            ProviderChoice::Remote(AdapterKind::Xai) => "grok",
            ProviderChoice::Remote(kind) => kind.as_str(),
            ProviderChoice::Offline => "offline",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderChoice::Remote(AdapterKind::Gemini) => "gemini-2.0-flash",
            ProviderChoice::Remote(AdapterKind::OpenAI) => "gpt-4o-mini",
            ProviderChoice::Remote(AdapterKind::Anthropic) => "claude-3-5-haiku-latest",
            ProviderChoice::Remote(AdapterKind::Ollama) => "llama3.2",
            ProviderChoice::Remote(AdapterKind::Groq) => "llama-3.1-8b-instant",
            ProviderChoice::Remote(AdapterKind::Xai) => "grok-3-mini",
            ProviderChoice::Remote(_) => "",
            ProviderChoice::Offline => "canned",
        }
    }

    /// Environment variable holding the API key, if the provider needs one
    pub fn key_env_var(&self) -> Option<&'static str> {
        match self {
            ProviderChoice::Remote(kind) => kind.default_key_env_name(),
            ProviderChoice::Offline => None,
        }
    }

    pub fn adapter(&self) -> Option<AdapterKind> {
        match self {
            ProviderChoice::Remote(kind) => Some(*kind),
            ProviderChoice::Offline => None,
        }
    }
}

impl FromStr for ProviderChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderChoice::Remote(AdapterKind::Gemini)),
            "openai" => Ok(ProviderChoice::Remote(AdapterKind::OpenAI)),
            "claude" | "anthropic" => Ok(ProviderChoice::Remote(AdapterKind::Anthropic)),
            "ollama" => Ok(ProviderChoice::Remote(AdapterKind::Ollama)),
            "groq" => Ok(ProviderChoice::Remote(AdapterKind::Groq)),
            "grok" | "xai" => Ok(ProviderChoice::Remote(AdapterKind::Xai)),
            "offline" | "basic" => Ok(ProviderChoice::Offline),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CropSavvyConfig {
    pub provider: ProviderChoice,

    /// Provider-specific model name
    pub model: String,

    /// Timeout for the advice call, in seconds
    pub request_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Overrides the provider's default endpoint
    pub api_base_url: Option<String>,
}

impl Default for CropSavvyConfig {
    /// Loads CROPSAVVY_* variables, falling back to defaults.
    ///
    /// An unrecognized provider name falls back to Gemini; use
    /// [`CropSavvyConfig::from_env`] to get the error instead.
    fn default() -> Self {
        Self::from_env()
            .unwrap_or_else(|_| Self::for_provider(ProviderChoice::Remote(AdapterKind::Gemini)))
    }
}

impl CropSavvyConfig {
    /// Loads CROPSAVVY_* variables, rejecting an unknown provider name.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("CROPSAVVY_PROVIDER") {
            Ok(name) => name.parse()?,
            Err(_) => ProviderChoice::Remote(AdapterKind::Gemini),
        };

        let mut config = Self::for_provider(provider);

        if let Ok(model) = env::var("CROPSAVVY_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }

        if let Some(timeout) = env::var("CROPSAVVY_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.request_timeout_secs = timeout;
        }

        if let Ok(level) = env::var("CROPSAVVY_LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }

        config.api_base_url = env::var("CROPSAVVY_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(config)
    }

    /// Defaults for `provider`, ignoring the environment
    pub fn for_provider(provider: ProviderChoice) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: None,
        }
    }

    /// Switches provider and resets the model to that provider's default.
    pub fn with_provider(mut self, provider: ProviderChoice) -> Self {
        if provider != self.provider {
            self.provider = provider;
            self.model = provider.default_model().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "No model configured for provider {}. Set CROPSAVVY_MODEL",
                self.provider
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(url) = &self.api_base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationFailed(format!(
                    "API base URL must start with http:// or https://: {}",
                    url
                )));
            }
        }

        Ok(())
    }

    /// Fails with `MissingCredentials` when the provider's key variable is unset.
    pub fn check_credentials(&self) -> Result<(), ConfigError> {
        match self.provider.key_env_var() {
            Some(env_var) if env::var(env_var).map(|v| v.trim().is_empty()).unwrap_or(true) => {
                Err(ConfigError::MissingCredentials {
                    provider: self.provider.to_string(),
                    env_var: env_var.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Builds the text-generation client for a remote provider.
    pub fn create_llm_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let kind = self.provider.adapter().ok_or_else(|| {
            ConfigError::ValidationFailed("the offline provider has no LLM client".to_string())
        })?;

        self.check_credentials()?;

        debug!(provider = %self.provider, model = %self.model, "Creating LLM client");
        let client = GenAIClient::new(
            kind,
            self.model.clone(),
            self.request_timeout(),
            self.api_base_url.clone(),
        )?;

        Ok(Arc::new(client))
    }

    /// Builds the advice provider the recommendation stage will call.
    pub fn create_advice_provider(&self) -> Result<Arc<dyn AdviceProvider>, ConfigError> {
        match self.provider {
            ProviderChoice::Offline => Ok(Arc::new(BasicAdviceProvider::new())),
            ProviderChoice::Remote(_) => {
                let client = self.create_llm_client()?;
                Ok(Arc::new(LlmAdviceProvider::new(client)))
            }
        }
    }
}

impl fmt::Display for CropSavvyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CropSavvy Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn remove(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clean_env() -> Vec<EnvGuard> {
        vec![
            EnvGuard::remove("CROPSAVVY_PROVIDER"),
            EnvGuard::remove("CROPSAVVY_MODEL"),
            EnvGuard::remove("CROPSAVVY_REQUEST_TIMEOUT"),
            EnvGuard::remove("CROPSAVVY_LOG_LEVEL"),
            EnvGuard::remove("CROPSAVVY_API_BASE_URL"),
        ]
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clean_env();

        let config = CropSavvyConfig::default();

        assert_eq!(config.provider, ProviderChoice::Remote(AdapterKind::Gemini));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.api_base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _clean = clean_env();
        let _guards = vec![
            EnvGuard::set("CROPSAVVY_PROVIDER", "Claude"),
            EnvGuard::set("CROPSAVVY_MODEL", "custom-model"),
            EnvGuard::set("CROPSAVVY_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("CROPSAVVY_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("CROPSAVVY_API_BASE_URL", "http://localhost:8080/v1/"),
        ];

        let config = CropSavvyConfig::from_env().unwrap();

        assert_eq!(config.provider, ProviderChoice::Remote(AdapterKind::Anthropic));
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://localhost:8080/v1/")
        );
    }

    #[test]
    #[serial]
    fn test_unknown_provider() {
        let _clean = clean_env();
        let _guard = EnvGuard::set("CROPSAVVY_PROVIDER", "watson");

        assert!(matches!(
            CropSavvyConfig::from_env(),
            Err(ConfigError::InvalidProvider(name)) if name == "watson"
        ));
        assert_eq!(
            CropSavvyConfig::default().provider,
            ProviderChoice::Remote(AdapterKind::Gemini)
        );
    }

    #[test]
    fn test_provider_names() {
        for name in ["gemini", "openai", "claude", "ollama", "groq", "grok", "offline"] {
            let choice: ProviderChoice = name.parse().unwrap();
            assert_eq!(choice.as_str(), name);
            assert!(!choice.default_model().is_empty());
        }
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CropSavvyConfig::for_provider(ProviderChoice::Offline);
        assert!(config.validate().is_ok());

        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.log_level = "info".to_string();
        config.api_base_url = Some("localhost:11434".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_provider_resets_model() {
        let config = CropSavvyConfig::for_provider(ProviderChoice::Remote(AdapterKind::Gemini))
            .with_provider(ProviderChoice::Remote(AdapterKind::Ollama));
        assert_eq!(config.model, "llama3.2");
    }

    #[test]
    #[serial]
    fn test_missing_credentials_fail_fast() {
        let provider = ProviderChoice::Remote(AdapterKind::Gemini);
        let env_var = provider.key_env_var().unwrap();
        let _guard = EnvGuard::remove(env_var);

        let config = CropSavvyConfig::for_provider(provider);
        match config.create_advice_provider() {
            Err(ConfigError::MissingCredentials {
                provider,
                env_var: var,
            }) => {
                assert_eq!(provider, "gemini");
                assert_eq!(var, env_var);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected missing credentials"),
        }
    }

    #[test]
    #[serial]
    fn test_providers_without_credentials() {
        let offline = CropSavvyConfig::for_provider(ProviderChoice::Offline);
        let provider = offline.create_advice_provider().unwrap();
        assert_eq!(provider.name(), "offline");
        assert!(offline.create_llm_client().is_err());

        let ollama = CropSavvyConfig::for_provider(ProviderChoice::Remote(AdapterKind::Ollama));
        assert!(ollama.check_credentials().is_ok());
        assert!(ollama.create_advice_provider().is_ok());
    }

    #[test]
    #[serial]
    fn test_config_display() {
        let config = CropSavvyConfig::for_provider(ProviderChoice::Offline);
        let display = format!("{}", config);
        assert!(display.contains("CropSavvy Configuration:"));
        assert!(display.contains("Provider: offline"));
    }
}
