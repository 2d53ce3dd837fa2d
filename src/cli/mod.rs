pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    AdviseArgs, AnalyzeArgs, BackendArgs, CliArgs, Commands, HealthArgs, ModelsArgs,
    OutputFormatArg,
};
pub use output::{HealthStatus, OutputFormat, OutputFormatter};
