//! Sweep transaction building and encoding.
//!
//! # Responsibilities
//! - Fee reserve arithmetic for a plain native transfer
//! - Build the unsigned legacy transfer
//! - Encode the signed transaction for `eth_sendRawTransaction`
//!
//! # Design Decisions
//! - Gas price is at most `u128` and the limit is fixed, so `gas_price * limit`
//!   always fits in `U256`; no floating point, no saturation
//! - Legacy (type 0) transactions priced from `eth_gasPrice`, signed with EIP-155

use alloy::consensus::{Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::blockchain::types::ChainId;

/// Protocol-defined gas for a value transfer with no payload.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Maximum fee a plain transfer can cost at `gas_price`.
pub fn gas_cost(gas_price: u128) -> U256 {
    U256::from(gas_price) * U256::from(TRANSFER_GAS_LIMIT)
}

/// Value left after reserving the transfer fee, if any.
///
/// Returns `None` when `balance <= gas_price * 21000`; a zero-value sweep is never produced.
pub fn sweepable_value(balance: U256, gas_price: u128) -> Option<U256> {
    let cost = gas_cost(gas_price);
    (balance > cost).then(|| balance - cost)
}

/// Build the unsigned transfer moving `value` to `receiver`.
pub fn build_sweep_transaction(
    nonce: u64,
    receiver: Address,
    value: U256,
    gas_price: u128,
    chain_id: ChainId,
) -> TxLegacy {
    TxLegacy {
        chain_id: Some(chain_id.0),
        nonce,
        gas_price,
        gas_limit: TRANSFER_GAS_LIMIT,
        to: TxKind::Call(receiver),
        value,
        input: Bytes::new(),
    }
}

/// A signed transfer ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedSweep {
    /// Content-derived transaction hash.
    pub hash: TxHash,
    /// EIP-2718 encoding (plain RLP for legacy transactions).
    pub raw: Bytes,
}

impl From<Signed<TxLegacy>> for SignedSweep {
    fn from(signed: Signed<TxLegacy>) -> Self {
        let hash = *signed.hash();
        let raw = TxEnvelope::Legacy(signed).encoded_2718().into();
        Self { hash, raw }
    }
}
