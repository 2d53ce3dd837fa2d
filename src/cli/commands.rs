use crate::config::ProviderChoice;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Crop disease triage: upload a plant photo, get a label and care advice
#[derive(Parser, Debug)]
#[command(
    name = "cropsavvy",
    about = "Crop disease triage from a plant photo",
    version,
    author,
    long_about = "cropsavvy screens a plant photo, assigns one of seven disease labels and asks \
                  a text-generation backend (Gemini, OpenAI, Claude, Ollama, Groq, Grok) for \
                  educational care advice. The label comes from a placeholder classifier, not \
                  a trained vision model."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a plant photo",
        long_about = "Uploads the image, classifies it and fetches recommendations.\n\n\
                      Examples:\n  \
                      cropsavvy analyze leaf.jpg\n  \
                      cropsavvy analyze leaf.png --format json\n  \
                      cropsavvy analyze leaf.webp --provider ollama --model llama3.2\n  \
                      cropsavvy analyze leaf.jpg --provider offline --seed 7"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Get recommendations for a known disease",
        long_about = "Sends {disease, confidence} to the advice backend and prints the response \
                      payload.\n\n\
                      Examples:\n  \
                      cropsavvy advise --disease \"Early Blight\" --confidence 70\n  \
                      cropsavvy advise --disease Healthy --provider offline"
    )]
    Advise(AdviseArgs),

    #[command(
        about = "Check advice backend connectivity",
        long_about = "Sends a trivial prompt to the configured backend. For Ollama the server \
                      is probed first.\n\n\
                      Examples:\n  \
                      cropsavvy health\n  \
                      cropsavvy health --provider ollama"
    )]
    Health(HealthArgs),

    #[command(about = "List the models a provider offers")]
    Models(ModelsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "IMAGE", help = "Plant photo (.jpg, .jpeg, .png or .webp, up to 10 MiB)")]
    pub image: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,

    #[arg(long, value_name = "SEED", help = "Seed the placeholder classifier for repeatable labels")]
    pub seed: Option<u64>,

    #[arg(long, help = "Run as a signed-out user (uploads are refused)")]
    pub guest: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AdviseArgs {
    #[arg(short = 'd', long, value_name = "DISEASE", help = "Disease label, e.g. \"Late Blight\"")]
    pub disease: String,

    #[arg(
        short = 'c',
        long,
        value_name = "PERCENT",
        default_value = "70",
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "Detection confidence"
    )]
    pub confidence: u8,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ModelsArgs {
    #[arg(
        short = 'p',
        long,
        value_parser = parse_provider,
        help = "Provider to query (defaults to CROPSAVVY_PROVIDER)"
    )]
    pub provider: Option<ProviderChoice>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

/// Flags that override the environment configuration
#[derive(Parser, Debug, Clone, Default)]
pub struct BackendArgs {
    #[arg(
        short = 'p',
        long,
        value_parser = parse_provider,
        help = "Advice backend: gemini, openai, claude, ollama, groq, grok or offline"
    )]
    pub provider: Option<ProviderChoice>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name (provider-specific)")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Advice request timeout in seconds")]
    pub timeout: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_provider(s: &str) -> Result<ProviderChoice, String> {
    s.parse::<ProviderChoice>().map_err(|e| e.to_string())
}
