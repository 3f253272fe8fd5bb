//! Command line interface for the imece-ingest binary
//!
//! Two subcommands: `inspect` previews delimiter detection and the header
//! mapping without touching any store, `run` executes a full import against
//! Postgres (or an in-memory store with `--dry-run`).

use crate::fields::BeneficiaryField;
use crate::intake::{self, Delimiter};
use crate::mapping::HeaderMapping;
use crate::store::MemoryStore;
#[cfg(feature = "database")]
use crate::store::PgStore;
use crate::store::RecordStore;
use crate::{ImportConfig, ImportPipeline, ImportReport};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use imece_common::checksum::sha256_bytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "imece-ingest")]
#[command(author, version, about = "Bulk beneficiary import tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the detected delimiter and header mapping for a file
    Inspect {
        /// Input file
        file: PathBuf,

        /// Delimiter (comma, semicolon, tab, pipe); auto-detected when omitted
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Import a file of beneficiary records
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input file
    pub file: PathBuf,

    /// Delimiter (comma, semicolon, tab, pipe); auto-detected when omitted
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Target table
    #[arg(short, long, default_value = "beneficiaries")]
    pub table: String,

    /// Records per batch
    #[arg(long, default_value_t = crate::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Per-batch timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub batch_timeout: u64,

    /// Override one mapping as field=header; repeatable, empty header unmaps
    #[arg(short, long = "map", value_name = "FIELD=HEADER")]
    pub map: Vec<String>,

    /// Commit to an in-memory store instead of the database
    #[arg(long)]
    pub dry_run: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect { file, delimiter } => inspect(&file, delimiter.as_deref()).await,
        Command::Run(args) => run(args).await,
    }
}

async fn inspect(file: &Path, delimiter: Option<&str>) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let hint = parse_delimiter(delimiter)?;

    let parsed = intake::parse(&bytes, hint)?;
    let mapping = HeaderMapping::detect(&parsed.headers);

    println!("file:      {}", file.display());
    println!("sha256:    {}", sha256_bytes(&bytes));
    println!("delimiter: {}", parsed.delimiter);
    println!("headers:   {}", parsed.headers.len());
    println!("rows:      {}", parsed.rows.len());
    println!();
    println!("mapping ({} of {} fields):", mapping.mapped_count(), BeneficiaryField::ALL.len());
    for field in BeneficiaryField::ALL {
        match mapping.source(field) {
            Some(header) => println!("  {:<16} <- {:?}", field.as_str(), header),
            None => println!("  {:<16} (unmapped)", field.as_str()),
        }
    }
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    info!("read {} byte(s) from {}", bytes.len(), args.file.display());

    let hint = parse_delimiter(args.delimiter.as_deref())?;
    let mut config = ImportConfig::new()
        .with_table(&args.table)
        .with_chunk_size(args.chunk_size)
        .with_batch_timeout(Duration::from_secs(args.batch_timeout));
    if let Some(delimiter) = hint {
        config = config.with_delimiter(delimiter);
    }

    // explicit overrides need the headers up front
    let mapping = if args.map.is_empty() {
        None
    } else {
        let parsed = intake::parse(&bytes, hint)?;
        let mut mapping = HeaderMapping::detect(&parsed.headers);
        apply_overrides(&mut mapping, &args.map)?;
        Some(mapping)
    };

    let cancel = CancellationToken::new();
    let ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc.cancel();
        }
    });

    if args.dry_run {
        let pipeline = ImportPipeline::new(MemoryStore::new(), config);
        let report = run_import(&pipeline, &bytes, mapping.as_ref(), &cancel).await?;
        print_report(&report, args.json)?;
        println!("dry run: nothing was written to the database");
        return Ok(());
    }

    #[cfg(feature = "database")]
    {
        let url = args
            .database_url
            .as_deref()
            .context("DATABASE_URL is not set; pass --database-url or use --dry-run")?;
        let store = PgStore::connect(url).await?;
        info!("connected to database");

        let pipeline = ImportPipeline::new(store, config);
        let report = run_import(&pipeline, &bytes, mapping.as_ref(), &cancel).await?;
        print_report(&report, args.json)?;
        return Ok(());
    }

    #[cfg(not(feature = "database"))]
    anyhow::bail!("this build has no database support; use --dry-run or rebuild with --features database");
}

async fn run_import<S: RecordStore>(
    pipeline: &ImportPipeline<S>,
    bytes: &[u8],
    mapping: Option<&HeaderMapping>,
    cancel: &CancellationToken,
) -> Result<ImportReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .context("invalid progress template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("importing...");

    let report = pipeline.run_with_mapping(bytes, mapping, cancel).await;
    spinner.finish_and_clear();

    Ok(report?)
}

fn print_report(report: &ImportReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", report.summary());
    if !report.rejection_reasons.is_empty() {
        println!(
            "rejections (showing {} of {}):",
            report.rejection_reasons.len(),
            report.rejected_rows
        );
        for reason in &report.rejection_reasons {
            println!("  - {}", reason);
        }
    }
    if report.progress < 100 {
        println!("run stopped at {}% (cancelled)", report.progress);
    }
    Ok(())
}

fn parse_delimiter(spec: Option<&str>) -> Result<Option<Delimiter>> {
    spec.map(str::parse).transpose()
}

fn apply_overrides(mapping: &mut HeaderMapping, specs: &[String]) -> Result<()> {
    for spec in specs {
        let (field, header) = spec
            .split_once('=')
            .with_context(|| format!("invalid --map {:?}, expected field=header", spec))?;
        let field: BeneficiaryField = field
            .trim()
            .parse()
            .with_context(|| format!("unknown field in --map {:?}", spec))?;
        let header = header.trim();
        mapping.set(field, (!header.is_empty()).then(|| header.to_string()));
    }
    Ok(())
}
