//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (pending nonce, balance, gas price, chain id)
//! - Submit signed raw transactions
//! - Handle timeouts, deadlines and cancellation via [`CallContext`]
//!
//! No call is ever retried here; callers decide.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::resilience::timeouts::CallContext;

/// Chain state queries and broadcast needed by a sweep.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Transaction count of `address` including pending transactions.
    async fn pending_nonce(&self, address: Address, ctx: &CallContext) -> BlockchainResult<u64>;

    /// Latest balance of `address` in wei.
    async fn balance(&self, address: Address, ctx: &CallContext) -> BlockchainResult<U256>;

    /// Point-in-time gas price suggestion in wei.
    async fn gas_price(&self, ctx: &CallContext) -> BlockchainResult<u128>;

    /// Chain identifier reported by the endpoint.
    async fn chain_id(&self, ctx: &CallContext) -> BlockchainResult<ChainId>;

    /// Submit an encoded signed transaction.
    async fn broadcast(&self, raw_tx: Bytes, ctx: &CallContext) -> BlockchainResult<TxHash>;
}

/// JSON-RPC client over HTTP.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
}

impl RpcChainClient {
    /// Build a client for `rpc_url` without touching the network.
    pub fn new(rpc_url: &str) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| BlockchainError::InvalidUrl {
            url: rpc_url.to_string(),
            message: e.to_string(),
        })?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Build a client and verify the endpoint answers.
    ///
    /// # Arguments
    /// * `rpc_url` - JSON-RPC endpoint
    /// * `probe_timeout` - Maximum time to wait for the probe
    ///
    /// # Returns
    /// A connected client, or the error that makes the endpoint unusable
    pub async fn connect(rpc_url: &str, probe_timeout: Duration) -> BlockchainResult<Self> {
        let client = Self::new(rpc_url)?;
        let chain_id = client.chain_id(&CallContext::new(probe_timeout)).await?;

        tracing::info!(
            rpc_url = %client.rpc_url,
            chain_id = chain_id.0,
            "Blockchain client initialized"
        );

        Ok(client)
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

fn rpc_error(op: &'static str) -> impl FnOnce(TransportError) -> BlockchainError {
    move |e| BlockchainError::Connection {
        op,
        message: e.to_string(),
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn pending_nonce(&self, address: Address, ctx: &CallContext) -> BlockchainResult<u64> {
        const OP: &str = "eth_getTransactionCount";
        ctx.guard(OP, async {
            self.provider
                .get_transaction_count(address)
                .pending()
                .await
                .map_err(rpc_error(OP))
        })
        .await
    }

    async fn balance(&self, address: Address, ctx: &CallContext) -> BlockchainResult<U256> {
        const OP: &str = "eth_getBalance";
        ctx.guard(OP, async {
            self.provider.get_balance(address).await.map_err(rpc_error(OP))
        })
        .await
    }

    async fn gas_price(&self, ctx: &CallContext) -> BlockchainResult<u128> {
        const OP: &str = "eth_gasPrice";
        ctx.guard(OP, async { self.provider.get_gas_price().await.map_err(rpc_error(OP)) })
            .await
    }

    async fn chain_id(&self, ctx: &CallContext) -> BlockchainResult<ChainId> {
        const OP: &str = "eth_chainId";
        ctx.guard(OP, async {
            self.provider
                .get_chain_id()
                .await
                .map(ChainId)
                .map_err(rpc_error(OP))
        })
        .await
    }

    async fn broadcast(&self, raw_tx: Bytes, ctx: &CallContext) -> BlockchainResult<TxHash> {
        const OP: &str = "eth_sendRawTransaction";
        ctx.guard(OP, async {
            match self.provider.send_raw_transaction(&raw_tx).await {
                Ok(pending) => Ok(*pending.tx_hash()),
                // A JSON-RPC error object means the node saw the transaction and refused it.
                Err(e) => match e.as_error_resp() {
                    Some(payload) => Err(BlockchainError::Broadcast(payload.message.to_string())),
                    None => Err(rpc_error(OP)(e)),
                },
            }
        })
        .await
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}
