use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("gas price too high: {price_gwei} gwei (max {max_gwei} gwei), try again later")]
    FeeTooHigh { price_gwei: u128, max_gwei: u128 },

    #[error("{op} transaction reverted")]
    TransactionReverted { op: &'static str },

    #[error("{op} failed: {message}")]
    Transaction { op: &'static str, message: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("invalid private key for wallet {index}: {reason}")]
    InvalidKey { index: usize, reason: String },

    #[error(transparent)]
    RetryExhausted(#[from] wormfarm_utils::RetryExhausted),
}
