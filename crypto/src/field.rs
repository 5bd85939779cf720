//! BN254 scalar field constants.

use alloy_primitives::U256;

/// BN254 scalar field modulus (the circom/snarkjs field):
/// 21888242871839275222246405745257275088548364400416034343698204186575808495617.
pub const FIELD_PRIME: U256 = U256::from_limbs([
    0x43E1_F593_F000_0001,
    0x2833_E848_79B9_7091,
    0xB850_45B6_8181_585D,
    0x3064_4E72_E131_A029,
]);

/// Reduce an arbitrary 256-bit value into the field.
pub fn reduce(value: U256) -> U256 {
    value % FIELD_PRIME
}

/// Increment a field element, wrapping at the modulus.
pub fn increment(value: U256) -> U256 {
    // value < FIELD_PRIME < 2^254, so the addition cannot overflow 2^256.
    (value + U256::from(1u64)) % FIELD_PRIME
}
