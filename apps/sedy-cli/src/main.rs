//! # sedy-cli
//!
//! Command-line entry point of the sedy typo-fix bot.
//!
//! - `sedy run --event <file|->` runs one parsed review event and prints the
//!   JSON result on stdout
//! - `sedy config` prints the effective configuration as TOML

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Sedy: commit the typo fixes reviewers ask for.
#[derive(Parser)]
#[command(name = "sedy", version, about)]
struct Cli {
    /// Configuration file (defaults are used when it does not exist).
    #[arg(long, global = true, default_value = "sedy.toml")]
    config: PathBuf,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the fixes of one parsed event to its pull request.
    Run {
        /// Event JSON file, or `-` to read it from stdin.
        #[arg(long)]
        event: PathBuf,
        /// GitHub token (overrides the `github.token_env` variable).
        #[arg(long)]
        token: Option<String>,
        /// Resolve and simulate commits without writing to GitHub.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("sedy=info".parse()?)
        .add_directive("sedy_pipeline=info".parse()?);

    // Logs go to stderr so stdout carries only the result.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    match &cli.command {
        Commands::Run {
            event,
            token,
            dry_run,
        } => commands::run::execute(&cli.config, event, token.as_deref(), *dry_run),
        Commands::Config => commands::config::execute(&cli.config),
    }
}
