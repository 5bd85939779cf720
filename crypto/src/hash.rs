//! Keccak-256 packed hashing.

use alloy_primitives::{keccak256, B256};

/// Hash multiple byte slices in sequence (solidity `abi.encodePacked` style,
/// avoids concatenation allocation).
pub fn keccak256_packed(parts: &[&[u8]]) -> B256 {
    let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        buf.extend_from_slice(part);
    }
    keccak256(&buf)
}

/// Count the leading zero bytes of a digest.
pub fn leading_zero_bytes(digest: &B256) -> usize {
    digest.iter().take_while(|b| **b == 0).count()
}
