//! Burn-key search (single-threaded CPU).

use alloy_primitives::U256;
use rand::Rng;

use crate::{BurnKey, WorkError};
use wormfarm_crypto::{increment, keccak256_packed, leading_zero_bytes, reduce, Commitment};

/// Domain separation tag appended to every burn-key digest.
pub const DOMAIN_TAG: &[u8; 8] = b"EIP-7503";

/// Safety ceiling on search iterations. At difficulty 2 a key is expected
/// within ~65,536 attempts; hitting this limit indicates a misconfigured
/// difficulty, not bad luck.
pub const MAX_ITERATIONS: u64 = 10_000_000;

/// Search for a burn key whose digest has at least `difficulty` leading
/// zero bytes.
///
/// Starts from a cryptographically random field element and steps by one
/// (mod the field prime) until the digest over
/// `(candidate ‖ reveal ‖ commitment ‖ tag)` meets the target. Pure CPU
/// work with no shared state: searches for different wallets may run
/// concurrently without coordination.
pub fn search_burn_key(
    difficulty: usize,
    commitment: Commitment,
    reveal: U256,
) -> Result<BurnKey, WorkError> {
    let mut seed = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    let mut candidate = reduce(U256::from_be_bytes(seed));

    let reveal_be = reveal.to_be_bytes::<32>();
    let commitment_be = commitment.to_be_bytes();

    for _ in 0..MAX_ITERATIONS {
        let candidate_be = candidate.to_be_bytes::<32>();
        let digest = keccak256_packed(&[&candidate_be, &reveal_be, &commitment_be, DOMAIN_TAG]);
        if leading_zero_bytes(&digest) >= difficulty {
            return Ok(BurnKey(candidate));
        }
        candidate = increment(candidate);
    }

    Err(WorkError::ExhaustedSearch {
        iterations: MAX_ITERATIONS,
        difficulty,
    })
}

/// Check whether a key satisfies the difficulty target for the given
/// reveal amount and commitment.
pub fn validate_burn_key(
    key: &BurnKey,
    difficulty: usize,
    commitment: Commitment,
    reveal: U256,
) -> bool {
    let digest = keccak256_packed(&[
        &key.0.to_be_bytes::<32>(),
        &reveal.to_be_bytes::<32>(),
        &commitment.to_be_bytes(),
        DOMAIN_TAG,
    ]);
    leading_zero_bytes(&digest) >= difficulty
}
