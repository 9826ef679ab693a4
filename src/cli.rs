use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "policy-loki",
    about = "Push policy evaluation results to Grafana Loki",
    version,
    after_help = "Logs go to stderr unless log_file is set in the config.\nRUST_LOG overrides the configured log level."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to policy-loki.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send results to Loki, one push per result
    Push {
        /// Results file (YAML or JSON), or - for stdin
        input: String,

        /// Loki base URL (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the payloads that would be pushed
    Preview {
        /// Results file (YAML or JSON), or - for stdin
        input: String,
    },

    /// Print the resolved push URL
    Endpoint {
        /// Loki base URL (overrides config)
        #[arg(long)]
        host: Option<String>,
    },
}
