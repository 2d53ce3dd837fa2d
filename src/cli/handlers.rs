//! Command handlers. Each returns the process exit code.

use super::commands::{AdviseArgs, AnalyzeArgs, BackendArgs, HealthArgs, ModelsArgs};
use super::output::{HealthStatus, OutputFormat, OutputFormatter};
use crate::classify::PlaceholderClassifier;
use crate::config::{ConfigError, CropSavvyConfig, ProviderChoice};
use crate::ingest::{Ingestor, StaticAuth, UploadedFile, ValidationError};
use crate::llm::{ChatMessage, GenAIClient, LLMRequest};
use crate::pipeline::{Orchestrator, PipelineError, UploadOutcome};
use crate::progress::LoggingHandler;
use crate::recommend::{AdviceRequest, RecommendationError, RecommendationStage, HEALTH_CHECK_PROMPT};

use anyhow::{Context, Result};
use genai::adapter::AdapterKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const EXIT_SUCCESS: i32 = 0;
/// Pipeline or backend failure
pub const EXIT_FAILURE: i32 = 1;
/// Bad input, configuration or missing sign-in
pub const EXIT_USAGE: i32 = 2;

const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

#[derive(Debug, Error)]
#[error("Please log in to upload images")]
pub struct LoginRequired;

/// Loads the environment configuration and applies command-line overrides.
pub fn resolve_config(backend: &BackendArgs) -> Result<CropSavvyConfig, ConfigError> {
    let mut config = CropSavvyConfig::from_env()?;

    if let Some(provider) = backend.provider {
        debug!("Provider explicitly set to: {}", provider);
        config = config.with_provider(provider);
    }
    if let Some(model) = &backend.model {
        debug!("Model overridden to: {}", model);
        config.model = model.clone();
    }
    if let Some(timeout) = backend.timeout {
        config.request_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ValidationError>().is_some()
        || err.downcast_ref::<ConfigError>().is_some()
        || err.downcast_ref::<LoginRequired>().is_some()
    {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}

/// Text for stderr: the user-facing message where one exists, the full chain otherwise
fn failure_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        e.user_message().to_string()
    } else if let Some(e) = err.downcast_ref::<ValidationError>() {
        e.user_message().to_string()
    } else {
        format!("{:#}", err)
    }
}

fn report_failure(err: &anyhow::Error) -> i32 {
    error!("{:#}", err);
    eprintln!("{}", failure_message(err));

    if let Some(ConfigError::MissingCredentials { env_var, .. }) = err.downcast_ref::<ConfigError>() {
        eprintln!("\nPossible solutions:");
        eprintln!("  - Set the {} environment variable", env_var);
        eprintln!("  - Use a local backend: --provider ollama");
        eprintln!("  - Use the canned advice table: --provider offline");
    }

    exit_code_for(err)
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

pub async fn handle_analyze(args: &AnalyzeArgs, quiet: bool) -> i32 {
    match run_analyze(args, quiet).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

async fn run_analyze(args: &AnalyzeArgs, quiet: bool) -> Result<()> {
    let config = resolve_config(&args.backend)?;
    debug!("{}", config);

    let provider = config.create_advice_provider()?;
    let classifier = match args.seed {
        Some(seed) => PlaceholderClassifier::with_seed(seed),
        None => PlaceholderClassifier::new(),
    };
    let auth = if args.guest {
        StaticAuth::guest()
    } else {
        StaticAuth::authenticated()
    };

    let orchestrator = Orchestrator::new(
        Ingestor::new(Arc::new(auth)),
        Arc::new(classifier),
        RecommendationStage::new(provider).with_timeout(config.request_timeout()),
        Arc::new(LoggingHandler),
    );

    info!(
        session = %orchestrator.session_id(),
        provider = orchestrator.provider_name(),
        "Starting analysis"
    );

    match orchestrator
        .upload(UploadedFile::from_path(&args.image))
        .await
        .with_context(|| format!("Upload of {} rejected", args.image.display()))?
    {
        UploadOutcome::Accepted(asset) => {
            debug!(sha256 = asset.sha256(), "Upload accepted");
        }
        UploadOutcome::LoginRequired => return Err(LoginRequired.into()),
    }

    let format: OutputFormat = args.format.into();
    let progress = spinner(format == OutputFormat::Human && !quiet);
    progress.set_message("Analyzing image...");

    let outcome = orchestrator.detect().await;
    progress.finish_and_clear();

    let report = outcome.context("Analysis failed")?;
    let output = OutputFormatter::new(format).format_report(&report)?;
    println!("{}", output);

    Ok(())
}

pub async fn handle_advise(args: &AdviseArgs) -> i32 {
    match run_advise(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

async fn run_advise(args: &AdviseArgs) -> Result<()> {
    let config = resolve_config(&args.backend)?;
    let provider = config.create_advice_provider()?;

    let request = AdviceRequest {
        disease: args.disease.clone(),
        confidence: args.confidence,
    };
    info!(
        "Getting recommendations for: {} ({}%)",
        request.disease, request.confidence
    );

    let response = match tokio::time::timeout(config.request_timeout(), provider.advise(&request))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(RecommendationError::TransportFailed(format!(
            "no answer within {}s",
            config.request_timeout_secs
        ))),
    }
    .context("Failed to get recommendations")?;

    let output = OutputFormatter::new(args.format.into()).format_advice(&response)?;
    println!("{}", output);
    Ok(())
}

pub async fn handle_health(args: &HealthArgs) -> i32 {
    info!("Checking advice backend health");

    let config = match resolve_config(&args.backend) {
        Ok(config) => config,
        Err(e) => return report_failure(&anyhow::Error::from(e)),
    };

    let status = check_health(&config).await;

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_health(&status) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Failed to format health output: {}", e);
            return EXIT_FAILURE;
        }
    }

    if status.available {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

fn ollama_host(config: &CropSavvyConfig) -> String {
    let host = config
        .api_base_url
        .clone()
        .or_else(|| env::var("OLLAMA_HOST").ok())
        .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());

    let host = host.trim_end_matches('/');
    host.strip_suffix("/v1").unwrap_or(host).to_string()
}

/// Confirms an Ollama server answers before a prompt is sent to it.
async fn probe_ollama(host: &str) -> Result<(), String> {
    let url = format!("{}/api/tags", host);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            debug!("Ollama is available at {}", host);
            Ok(())
        }
        Ok(response) => Err(format!("{} answered {}", url, response.status())),
        Err(e) => Err(format!("Cannot connect to {}: {}", host, e)),
    }
}

async fn check_health(config: &CropSavvyConfig) -> HealthStatus {
    let provider = config.provider.as_str();
    let model = config.model.as_str();

    if config.provider == ProviderChoice::Offline {
        return HealthStatus::available(
            provider,
            model,
            "Offline advice table needs no backend".to_string(),
        );
    }

    if config.provider == ProviderChoice::Remote(AdapterKind::Ollama) {
        let host = ollama_host(config);
        if let Err(message) = probe_ollama(&host).await {
            warn!("Ollama is not available at {}", host);
            return HealthStatus::unavailable(provider, model, message)
                .with_details("Ensure Ollama is running: ollama serve".to_string());
        }
    }

    let client = match config.create_llm_client() {
        Ok(client) => client,
        Err(e) => {
            warn!("Cannot create {} client: {}", provider, e);
            let status = HealthStatus::unavailable(provider, model, e.to_string());
            return match config.provider.key_env_var() {
                Some(var) => status.with_details(format!("Set {} environment variable", var)),
                None => status,
            };
        }
    };

    let request = LLMRequest::new(vec![ChatMessage::user(HEALTH_CHECK_PROMPT)]).with_max_tokens(64);
    let start = Instant::now();

    match client.chat(request).await {
        Ok(response) if !response.is_blank() => {
            info!("{} answered in {}ms", provider, start.elapsed().as_millis());
            HealthStatus::available(provider, model, response.content.trim().to_string())
                .with_response_time(start.elapsed().as_millis() as u64)
        }
        Ok(_) => HealthStatus::unavailable(
            provider,
            model,
            "Backend returned an empty response".to_string(),
        ),
        Err(e) => {
            warn!("{} health check failed: {}", provider, e);
            HealthStatus::unavailable(provider, model, e.to_string())
        }
    }
}

pub async fn handle_models(args: &ModelsArgs) -> i32 {
    match run_models(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

async fn run_models(args: &ModelsArgs) -> Result<()> {
    let mut config = CropSavvyConfig::from_env()?;
    if let Some(provider) = args.provider {
        config = config.with_provider(provider);
    }

    let formatter = OutputFormatter::new(args.format.into());

    let Some(kind) = config.provider.adapter() else {
        let output = formatter.format_models(config.provider.as_str(), &[config.model.clone()])?;
        println!("{}", output);
        return Ok(());
    };

    let client = GenAIClient::new(
        kind,
        config.model.clone(),
        config.request_timeout(),
        config.api_base_url.clone(),
    )?;
    let models = client
        .list_models()
        .await
        .with_context(|| format!("Failed to list models for {}", config.provider))?;

    println!("{}", formatter.format_models(config.provider.as_str(), &models)?);
    Ok(())
}
