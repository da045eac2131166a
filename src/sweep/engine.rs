//! Per-account sweep.
//!
//! # Responsibilities
//! - Parse the sender key and derive its address
//! - Fetch nonce, balance, gas price and chain id, in that order
//! - Reserve the transfer fee and compute the swept value
//! - Sign (EIP-155) and broadcast the transfer
//!
//! # Design Decisions
//! - Fail fast: the first failing step decides the account's result
//! - Nothing is built or sent when `balance <= gas_price * 21000`
//! - Chain state is fetched fresh for every account, never cached

use alloy::primitives::Address;
use secrecy::SecretString;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::{build_sweep_transaction, gas_cost, sweepable_value, SignedSweep};
use crate::blockchain::wallet::Wallet;
use crate::resilience::timeouts::CallContext;
use crate::sweep::types::{SweepError, SweepReceipt, SweepResult};

/// Sweeps single accounts to a fixed receiver.
pub struct SweepEngine<C> {
    client: Arc<C>,
    receiver: Address,
}

impl<C: ChainClient> SweepEngine<C> {
    /// Create an engine sending everything to `receiver`.
    pub fn new(client: Arc<C>, receiver: Address) -> Self {
        Self { client, receiver }
    }

    /// Destination of every sweep.
    pub fn receiver(&self) -> Address {
        self.receiver
    }

    /// Sweep the account controlled by `key`.
    ///
    /// Never fails as a whole: every problem is captured in the returned result.
    pub async fn sweep(&self, index: usize, key: &SecretString, ctx: &CallContext) -> SweepResult {
        match Wallet::from_secret(key) {
            Ok(wallet) => self.sweep_wallet(index, &wallet, ctx).await,
            Err(e) => SweepResult::invalid_key(index, e),
        }
    }

    /// Sweep the account of an already parsed key.
    pub async fn sweep_wallet(&self, index: usize, wallet: &Wallet, ctx: &CallContext) -> SweepResult {
        let address = wallet.address();
        tracing::info!(account = index, sender = %address, "Sweeping account");

        SweepResult {
            index,
            address: Some(address),
            outcome: self.transfer(wallet, ctx).await,
        }
    }

    async fn transfer(&self, wallet: &Wallet, ctx: &CallContext) -> Result<SweepReceipt, SweepError> {
        let sender = wallet.address();

        let nonce = self
            .client
            .pending_nonce(sender, ctx)
            .await
            .map_err(SweepError::NonceFetchFailed)?;

        let balance = self
            .client
            .balance(sender, ctx)
            .await
            .map_err(SweepError::BalanceFetchFailed)?;

        let gas_price = self
            .client
            .gas_price(ctx)
            .await
            .map_err(SweepError::GasPriceFetchFailed)?;

        let chain_id = self
            .client
            .chain_id(ctx)
            .await
            .map_err(SweepError::ChainIdFetchFailed)?;

        tracing::debug!(
            sender = %sender,
            nonce,
            balance = %balance,
            gas_price,
            chain_id = chain_id.0,
            "Fetched chain state"
        );

        let value = sweepable_value(balance, gas_price).ok_or_else(|| SweepError::InsufficientBalance {
            balance,
            gas_cost: gas_cost(gas_price),
        })?;

        let tx = build_sweep_transaction(nonce, self.receiver, value, gas_price, chain_id);
        let signed: SignedSweep = wallet.sign_transaction(tx).map_err(SweepError::SignFailed)?.into();

        let tx_hash = self
            .client
            .broadcast(signed.raw, ctx)
            .await
            .map_err(SweepError::BroadcastFailed)?;

        if tx_hash != signed.hash {
            tracing::warn!(
                local_hash = %signed.hash,
                node_hash = %tx_hash,
                "Node reported a different transaction hash"
            );
        }

        tracing::info!(
            sender = %sender,
            receiver = %self.receiver,
            value = %value,
            tx_hash = %tx_hash,
            "Transaction sent"
        );

        Ok(SweepReceipt {
            tx_hash,
            value,
            nonce,
            gas_price,
            chain_id,
        })
    }
}
