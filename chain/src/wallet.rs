//! Wallet identity — signing key plus derived address.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::fmt;

use crate::ChainError;

/// A configured wallet. Immutable once loaded; the orchestrator owns all
/// wallets for the process lifetime.
#[derive(Clone)]
pub struct Wallet {
    name: String,
    signer: PrivateKeySigner,
    address: Address,
}

impl Wallet {
    /// Build a wallet from a hex private key (`0x` prefix optional).
    ///
    /// `index` is zero-based and only used for the display name and error
    /// messages.
    pub fn from_private_key(private_key: &str, index: usize) -> Result<Self, ChainError> {
        let trimmed = private_key.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = hex::decode(hex_part).map_err(|e| ChainError::InvalidKey {
            index: index + 1,
            reason: format!("not valid hex: {e}"),
        })?;
        if bytes.len() != 32 {
            return Err(ChainError::InvalidKey {
                index: index + 1,
                reason: format!("expected 64 hex characters, got {}", hex_part.len()),
            });
        }

        let signer =
            PrivateKeySigner::from_slice(&bytes).map_err(|e| ChainError::InvalidKey {
                index: index + 1,
                reason: e.to_string(),
            })?;
        let address = signer.address();

        Ok(Self {
            name: format!("Wallet {}", index + 1),
            signer,
            address,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Shortened address for display: `0x1234...abcd`.
    pub fn short_address(&self) -> String {
        let full = format!("{:#x}", self.address);
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Debug for Wallet {
    /// Redacts the signing key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("address", &self.short_address())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
