//! Cryptographic primitives for the WORM farmer.
//!
//! - **Keccak-256** packed hashing (EVM `abi.encodePacked` convention)
//! - **BN254** scalar field constants and reduction
//! - Burn commitment derivation
//!
//! The zero-knowledge proof itself is produced by a remote prover; nothing
//! here touches circuits.

pub mod commitment;
pub mod field;
pub mod hash;

pub use commitment::{derive_commitment, Commitment};
pub use field::{increment, reduce, FIELD_PRIME};
pub use hash::{keccak256_packed, leading_zero_bytes};
