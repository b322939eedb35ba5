//! Pipeline run implementation.

use anyhow::{Context, Result};
use dispatcher::{create_file_sink, Dispatcher, RunReport};
use ingestion::DataDirSource;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::error::CliError;
use crate::summary::print_run_summary;

/// Execute the pipeline: data directory → worker pool → output file
pub async fn run_pipeline(cli: &Cli) -> Result<()> {
    let config = cli.pool_config();
    config
        .validate()
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    info!(
        data_dir = %cli.data_dir.display(),
        out_file = %cli.out_file.display(),
        workers = config.workers,
        queue_capacity = config.capacity(),
        "Configuration loaded"
    );

    let sink = create_file_sink(&cli.out_file)
        .await
        .map_err(|e| CliError::output_file(&cli.out_file, e.to_string()))?;

    let source = DataDirSource::open(&cli.data_dir)
        .await
        .map_err(|e| CliError::data_dir(&cli.data_dir, e.to_string()))?;
    info!(count = source.file_count(), "Collected data files");
    let ingestion_metrics = source.metrics();

    let dispatcher = Dispatcher::new(config, sink).context("Failed to build worker pool")?;

    let report = run_until_shutdown(dispatcher, source).await?;

    info!(
        count = report.submitted,
        failed = report.failed(),
        duration_secs = report.duration.as_secs_f64(),
        throughput = format!("{:.2}", report.throughput()),
        "Pipeline completed successfully"
    );

    print_run_summary(
        &report,
        &ingestion_metrics.snapshot(),
        &cli.out_file,
        &mut std::io::stdout().lock(),
    )
        .map_err(CliError::from)?;

    Ok(())
}

/// Run the dispatcher, cancelling it on Ctrl+C / SIGTERM
///
/// The dispatcher is always awaited to completion so every worker has
/// stopped before this returns.
async fn run_until_shutdown(
    dispatcher: Dispatcher<dispatcher::FileSink>,
    source: DataDirSource,
) -> Result<RunReport> {
    let cancel = CancellationToken::new();
    let metrics = dispatcher.metrics();
    let run = dispatcher.run(source, &cancel);
    tokio::pin!(run);

    let result = tokio::select! {
        result = &mut run => result,
        _ = shutdown_signal() => {
            let snapshot = metrics.snapshot();
            warn!(
                completed = snapshot.completed(),
                in_flight = snapshot.in_flight(),
                "Received shutdown signal, stopping workers..."
            );
            cancel.cancel();
            run.await
        }
    };

    result.map_err(|e| {
        if let Some(submitted) = e.submitted() {
            error!(submitted, "Worker pool stopped before draining every job");
        }
        CliError::pipeline_execution(e.to_string()).into()
    })
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
