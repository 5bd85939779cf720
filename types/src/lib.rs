//! Shared value types for the WORM multi-wallet farmer.
//!
//! Amounts are wei-denominated integers, never floats. Contract addresses
//! and fixed protocol policy live in [`ProtocolParams`]; everything
//! operator-tunable belongs to the orchestrator's config instead.

pub mod amount;
pub mod burn;
pub mod params;

pub use amount::{format_ether, parse_ether, BethAmount, EthAmount, WormAmount};
pub use burn::BurnRequest;
pub use params::ProtocolParams;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountParseError {
    #[error("empty amount string")]
    Empty,

    #[error("more than 18 decimal places ({0})")]
    TooManyDecimals(usize),

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount overflows u128 wei: {0}")]
    Overflow(String),
}

#[derive(Debug, Error)]
pub enum BurnRequestError {
    #[error("protocol fee {fee} wei must be below burn amount {amount} wei")]
    FeeExceedsAmount { fee: u128, amount: u128 },
}
