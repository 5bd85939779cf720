//! Burn-key proof-of-work.
//!
//! Not consensus mining — a client-side search for a secret field element
//! whose digest, combined with the reveal amount and burn commitment,
//! carries enough leading zero bytes to be accepted by the prover. At the
//! default difficulty of 2 bytes this resolves in well under a second.

pub mod error;
pub mod search;

pub use error::WorkError;
pub use search::{search_burn_key, validate_burn_key, DOMAIN_TAG, MAX_ITERATIONS};

use alloy_primitives::U256;

/// The result of a burn-key search. Single-use: one key feeds exactly one
/// proof request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnKey(pub U256);

impl BurnKey {
    /// Decimal string form, as the remote prover API expects.
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }
}
