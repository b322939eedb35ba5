//! `--dry-run` implementation: scan the data directory, write nothing.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PoolConfig;
use ingestion::{scan_data_dir, DirSummary};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::error::CliError;
use crate::summary::print_scan_summary;

/// JSON shape of the dry-run output
#[derive(Debug, Serialize)]
struct DryRunReport<'a> {
    pool: &'a PoolConfig,
    out_file: &'a Path,
    data: &'a DirSummary,
}

/// Execute a dry run
pub async fn run_dry_run(cli: &Cli) -> Result<()> {
    let config = cli.pool_config();
    config
        .validate()
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    let summary = scan_data_dir(&cli.data_dir)
        .await
        .map_err(|e| CliError::data_dir(&cli.data_dir, e.to_string()))?;

    info!(
        files = summary.files.len(),
        jobs = summary.total_lines,
        "Dry run mode - data directory scanned, exiting"
    );

    if cli.json {
        let report = DryRunReport {
            pool: &config,
            out_file: &cli.out_file,
            data: &summary,
        };
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize dry-run report")?;
        println!("{json}");
    } else {
        print_scan_summary(&summary, config.workers, &mut std::io::stdout().lock())
            .map_err(CliError::from)?;
    }

    Ok(())
}
