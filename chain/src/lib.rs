//! Chain access for the WORM farmer.
//!
//! Balance and epoch reads, plus the ordered transaction sequence that
//! spends a burn: burn transfer, mint-from-proof, approval, epoch
//! participation and reward claims. Reads go through a backoff retry;
//! transactions are never resubmitted automatically.

pub mod client;
pub mod contracts;
pub mod error;
pub mod transactor;
pub mod wallet;

pub use client::{ChainReader, RpcChain, WalletBalances};
pub use error::ChainError;
pub use transactor::{ApproveOutcome, Transactor, TxOutcome};
pub use wallet::Wallet;
