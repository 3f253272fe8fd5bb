//! Imece Ingest - bulk beneficiary import tool

use anyhow::Result;
use clap::Parser;
use imece_common::logging::{init_logging, LogConfig, LogLevel};
use imece_ingest::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // IMECE_LOG_* variables first, then the CLI flag on top
    let mut log_config = LogConfig::from_env()?.with_file_prefix("imece-ingest");
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    cli::execute(cli).await
}
