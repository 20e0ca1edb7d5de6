//! CLI for the refetch resilient fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use refetch_core::config;

use commands::{run_get, run_show_config};

/// Top-level CLI for the refetch fetcher.
#[derive(Debug, Parser)]
#[command(name = "refetch")]
#[command(about = "refetch: resilient remote-data fetcher", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL as JSON with bounded retries and print the result.
    Get {
        /// Direct HTTP/HTTPS URL to fetch.
        url: String,

        /// Maximum number of attempts, including the first.
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,

        /// Delay between attempts in milliseconds.
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Overall deadline for the whole call, in seconds.
        #[arg(long, value_name = "SECS")]
        deadline_secs: Option<u64>,

        /// Pretty-print the decoded JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Show the resolved configuration and its path.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                max_attempts,
                delay_ms,
                deadline_secs,
                pretty,
            } => run_get(&cfg, &url, max_attempts, delay_ms, deadline_secs, pretty).await?,
            CliCommand::Config => run_show_config(&cfg)?,
        }

        Ok(())
    }
}
