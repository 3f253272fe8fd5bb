//! Build automation for the imece workspace
//!
//! Repo chores that do not belong in the shipped binaries. The only task so
//! far regenerates the CLI reference under docs/ from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the imece workspace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Render the imece-ingest CLI reference as Markdown
    GenerateCliDocs {
        /// Directory the rendered markdown lands in
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Rendering imece-ingest CLI reference...");

    let markdown = clap_markdown::help_markdown::<imece_ingest::Cli>();

    let content = format!(
        r#"# imece-ingest CLI Reference

Rendered from the clap command definitions. Last updated: {}.

## Overview

`imece-ingest` imports delimited beneficiary exports into the database:
it maps arbitrary (Turkish or English) column headers onto the canonical
beneficiary schema, normalizes dates, validates rows, and commits accepted
records in bounded batches. Rejected rows and failed batches never abort a
run; everything is tallied in the final report.

## Quick Start

```bash
# Preview delimiter detection and the header mapping
imece-ingest inspect beneficiaries.csv

# Import without touching the database
imece-ingest run beneficiaries.csv --dry-run

# Full import, fixing up one mapping by hand
imece-ingest run beneficiaries.csv --map "mobile_phone=GSM No"

# Semicolon-delimited export into a staging table
imece-ingest run export.csv --delimiter semicolon --table beneficiaries_staging
```

## Commands

{}

## Environment Variables

- `DATABASE_URL` - Postgres connection string for `run` without `--dry-run`
- `IMECE_LOG_LEVEL` - Logging level (`trace`, `debug`, `info`, `warn`, `error`)
- `IMECE_LOG_OUTPUT` - Log destination (`console`, `file`, `both`)
- `IMECE_LOG_FORMAT` - Log line format (`text`, `json`)
- `IMECE_LOG_DIR` - Directory for log files when file output is enabled

---

*Rendered by `cargo xtask generate-cli-docs`; edit the clap definitions, not this file.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli.md");
    fs::write(&file_path, content)?;

    println!("Wrote {}", file_path.display());

    Ok(())
}
