//! Sender key handling and transaction signing.
//!
//! # Security
//! - Keys arrive as `SecretString` and are only exposed for parsing
//! - Keys are never logged or serialized; `Debug` prints the address only

use alloy::consensus::{SignableTransaction, Signed, TxLegacy};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use secrecy::{ExposeSecret, SecretString};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// A single sweep source account.
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Create a wallet from configured secret key material.
    pub fn from_secret(key: &SecretString) -> BlockchainResult<Self> {
        Self::from_private_key(key.expose_secret())
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a legacy transaction.
    ///
    /// The transaction's `chain_id` must already be set; it is folded into the
    /// signature hash (EIP-155) so the result cannot be replayed on another network.
    pub fn sign_transaction(&self, tx: TxLegacy) -> BlockchainResult<Signed<TxLegacy>> {
        if tx.chain_id.is_none() {
            return Err(BlockchainError::Signing(
                "refusing to sign a transaction without a chain id".to_string(),
            ));
        }

        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok(tx.into_signed(signature))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
