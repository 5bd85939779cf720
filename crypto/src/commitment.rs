//! Burn commitment derivation.
//!
//! The commitment binds the fee split and receiver to a burn before the
//! burn key is searched:
//!
//! `keccak256(abi.encodePacked(broadcasterFee, proverFee, receiver, receiverHook)) >> 8`
//!
//! The one-byte right shift brings the 256-bit digest inside the BN254
//! scalar field used by the proving circuit.

use alloy_primitives::{Address, U256};
use std::fmt;

use crate::hash::keccak256_packed;

/// A public commitment scoping a burn key's validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Commitment(U256);

impl Commitment {
    pub fn value(&self) -> U256 {
        self.0
    }

    /// 32-byte big-endian encoding, as hashed into the burn-key digest.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Derive the burn commitment from fee fields, receiver and hook payload.
///
/// Deterministic: identical inputs always yield the identical commitment.
pub fn derive_commitment(
    receiver: Address,
    prover_fee: U256,
    broadcaster_fee: U256,
    receiver_hook: &[u8],
) -> Commitment {
    let broadcaster_be = broadcaster_fee.to_be_bytes::<32>();
    let prover_be = prover_fee.to_be_bytes::<32>();
    let digest = keccak256_packed(&[
        &broadcaster_be,
        &prover_be,
        receiver.as_slice(),
        receiver_hook,
    ]);
    Commitment(U256::from_be_bytes(digest.0) >> 8)
}
