use cropsavvy::cli::commands::{CliArgs, Commands};
use cropsavvy::cli::handlers::{handle_advise, handle_analyze, handle_health, handle_models};
use cropsavvy::util::logging::{init_logging, parse_level, LoggingConfig};
use cropsavvy::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("cropsavvy v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, args.quiet).await,
        Commands::Advise(advise_args) => handle_advise(advise_args).await,
        Commands::Health(health_args) => handle_health(health_args).await,
        Commands::Models(models_args) => handle_models(models_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        });
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
