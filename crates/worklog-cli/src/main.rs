//! Worklog CLI - time-entry ETL and reporting tool
//!
//! Pulls time entries from the configured sources, caches them per day,
//! aggregates hours and publishes summaries to the configured sinks.

mod commands;
mod output;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "worklog")]
#[command(author, version, about = "Time-entry ETL and reporting CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (or set WORKLOG_CONFIG env var)
    #[arg(long, env = "WORKLOG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch entries, aggregate and publish to every configured sink
    Run {
        /// Override the configured range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Override the range end (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Fetch entries and update the cache without publishing
    Fetch {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Aggregate and publish from the cache, without touching any source
    Export {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => worklog_core::default_config_path()?,
    };
    let config = worklog_core::AppConfig::load(&config_path)?;

    // "today" is resolved exactly once per invocation
    let today = chrono::Local::now().date_naive();

    let ctx = commands::Context {
        config,
        today,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Run { start, end } => commands::run::execute(&ctx, start, end).await,
        Commands::Fetch { start, end } => commands::fetch::execute(&ctx, start, end).await,
        Commands::Export { start, end } => commands::export::execute(&ctx, start, end).await,
    }
}
