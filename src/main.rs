//! EVM native-token sweeper.
//!
//! # Architecture Overview
//!
//! ```text
//!   flags + config file
//!          │
//!          ▼
//!   ┌──────────────┐   fatal: non-zero exit, nothing sent
//!   │    config    │──────────────────────────────────────▶
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   fatal: non-zero exit, nothing sent
//!   │   connect    │──────────────────────────────────────▶
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//!   │ orchestrator │─────▶│ sweep engine │─────▶│ chain client │◀──▶ JSON-RPC
//!   │ (task pool)  │◀─────│ (per account)│◀─────│ (timeouts)   │
//!   └──────┬───────┘      └──────────────┘      └──────────────┘
//!          ▼
//!   one log line per account, exit 0
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use evm_sweeper::config::{resolve_config, ConfigOverrides};
use evm_sweeper::lifecycle::{self, signals, Shutdown, StartupError};
use evm_sweeper::observability::logging::{self, LogFormat};
use evm_sweeper::observability::metrics;
use evm_sweeper::sweep::SweepReport;

#[derive(Parser)]
#[command(name = "evm-sweeper")]
#[command(about = "Sweep the native balance of EVM accounts to one receiver", long_about = None)]
struct Cli {
    /// Path to a JSON (or .toml) config file; unknown keys are rejected
    #[arg(long)]
    config: Option<PathBuf>,

    /// EVM RPC URL
    #[arg(long)]
    rpc: Option<String>,

    /// Receiver address
    #[arg(long)]
    receiver: Option<String>,

    /// Sender private key (can be specified multiple times)
    #[arg(long = "sender", env = "SWEEP_SENDER_KEYS", value_delimiter = ',', hide_env_values = true)]
    senders: Vec<String>,

    /// Timeout for each RPC call, in seconds
    #[arg(long)]
    rpc_timeout_secs: Option<u64>,

    /// Deadline for the whole run, in seconds
    #[arg(long = "deadline-secs")]
    run_deadline_secs: Option<u64>,

    /// Maximum number of accounts swept concurrently
    #[arg(long = "concurrency")]
    max_concurrency: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Write run metrics in Prometheus text format to this file
    #[arg(long)]
    metrics_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            rpc: self.rpc.clone(),
            receiver: self.receiver.clone(),
            senders: self.senders.clone(),
            rpc_timeout_secs: self.rpc_timeout_secs,
            run_deadline_secs: self.run_deadline_secs,
            max_concurrency: self.max_concurrency,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = logging::error_chain(&e);
            tracing::error!(error = %message, "Fatal error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let metrics_handle = match &cli.metrics_file {
        Some(_) => match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Metrics recorder unavailable, continuing without metrics");
                None
            }
        },
        None => None,
    };

    let config = resolve_config(cli.overrides())?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        receiver = %config.receiver,
        accounts = config.sender_keys.len(),
        rpc_timeout_secs = config.rpc_timeout.as_secs(),
        max_concurrency = config.max_concurrency,
        "Configuration loaded"
    );

    let client = Arc::new(lifecycle::connect(&config).await?);

    let shutdown = Shutdown::new();
    let interrupt = signals::spawn_interrupt_handler(shutdown.clone());

    let report = lifecycle::run_sweep(config, client, &shutdown).await;
    interrupt.abort();

    log_report(&report);

    if let (Some(handle), Some(path)) = (&metrics_handle, &cli.metrics_file) {
        match metrics::write_textfile(handle, path) {
            Ok(()) => tracing::info!(path = %path.display(), "Metrics written"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to write metrics"),
        }
    }

    Ok(())
}

fn log_report(report: &SweepReport) {
    for result in &report.results {
        let sender = result
            .address
            .map(|a| a.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        match &result.outcome {
            Ok(receipt) => tracing::info!(
                account = result.index,
                sender = %sender,
                tx_hash = %receipt.tx_hash,
                value = %receipt.value,
                "Sweep succeeded"
            ),
            Err(e) => tracing::warn!(
                account = result.index,
                sender = %sender,
                kind = e.kind(),
                error = %logging::error_chain(e),
                "Sweep failed"
            ),
        }
    }

    tracing::info!(
        run_id = %report.run_id,
        succeeded = report.succeeded(),
        failed = report.failed(),
        total_swept = %report.total_swept(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Sweep run finished"
    );
}
