//! # linepool CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 参数与环境变量加载 (flag 优先)
//! - 工作池运行与 dry-run
//! - 优雅关闭处理

mod cli;
mod commands;
mod error;
mod summary;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::{error, info};

use cli::Cli;
use commands::{run_dry_run, run_pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        debug: cli.debug,
        metrics_port: cli.metrics_port(),
    })?;

    info!(version = env!("CARGO_PKG_VERSION"), "linepool starting");

    let result = if cli.dry_run {
        run_dry_run(&cli).await
    } else {
        run_pipeline(&cli).await
    };

    if let Err(ref e) = result {
        let message = format!("{e:#}");
        error!(error = %message, "Command failed");
    }

    result
}
