//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the configured endpoint
//! - Wire the engine, call context and orchestrator from a `SweepConfig`
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The connection probe uses the configured RPC timeout

use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::client::{ChainClient, RpcChainClient};
use crate::blockchain::types::BlockchainError;
use crate::config::{ConfigError, SweepConfig};
use crate::lifecycle::shutdown::Shutdown;
use crate::resilience::timeouts::CallContext;
use crate::sweep::{SweepEngine, SweepOrchestrator, SweepReport};

/// Errors that abort the process before any account is processed.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration")]
    Config(#[from] ConfigError),

    #[error("failed to connect to the EVM client")]
    Connection(#[from] BlockchainError),
}

/// Connect to the endpoint named in `config`.
pub async fn connect(config: &SweepConfig) -> Result<RpcChainClient, StartupError> {
    Ok(RpcChainClient::connect(&config.rpc_url, config.rpc_timeout).await?)
}

/// Sweep every configured account through `client`.
pub async fn run_sweep<C>(config: SweepConfig, client: Arc<C>, shutdown: &Shutdown) -> SweepReport
where
    C: ChainClient + 'static,
{
    let SweepConfig {
        receiver,
        sender_keys,
        rpc_timeout,
        run_deadline,
        max_concurrency,
        ..
    } = config;

    let mut ctx = CallContext::new(rpc_timeout).with_cancellation(shutdown.token());
    if let Some(deadline) = run_deadline {
        ctx = ctx.with_run_deadline(deadline);
    }

    let engine = SweepEngine::new(client, receiver);
    SweepOrchestrator::new(engine, ctx, max_concurrency)
        .run(sender_keys)
        .await
}
