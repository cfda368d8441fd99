//! riskscore CLI: score exam attempts and inspect cached analyses.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "riskscore",
    version,
    about = "Psychometric risk scoring for Likert exam attempts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an exam attempt, reusing the cached analysis when present
    Analyze {
        /// Path to the attempt file (.json or .toml)
        #[arg(long)]
        attempt: PathBuf,

        /// Exam attempt identifier used as the cache key
        #[arg(long)]
        key: String,

        /// Session identifier, cross-checked against the cached analysis
        #[arg(long)]
        session: Option<String>,

        /// Ignore any cached analysis and regenerate it
        #[arg(long)]
        force: bool,

        /// Cache directory (overrides config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the cached analysis for an attempt without recomputing it
    Show {
        /// Exam attempt identifier
        #[arg(long)]
        key: String,

        /// Cache directory (overrides config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an attempt file for rows that will be skipped or scored as zero
    Validate {
        /// Path to the attempt file
        #[arg(long)]
        attempt: PathBuf,
    },

    /// Create a starter config and example attempt
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("riskscore=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            attempt,
            key,
            session,
            force,
            cache_dir,
            format,
            config,
        } => {
            commands::analyze::execute(commands::analyze::AnalyzeArgs {
                attempt,
                key,
                session,
                force,
                cache_dir,
                format,
                config,
            })
            .await
        }
        Commands::Show {
            key,
            cache_dir,
            format,
            config,
        } => commands::show::execute(key, cache_dir, format, config).await,
        Commands::Validate { attempt } => commands::validate::execute(attempt),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
