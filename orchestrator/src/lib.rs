//! Orchestration engine for the WORM farmer.
//!
//! Composes the burn-key search, the remote prover and the chain
//! transactor into per-wallet operations, and drives them on a cycle
//! loop with failure gating and graceful shutdown.

pub mod config;
pub mod error;
pub mod miner;
pub mod orchestrator;
pub mod shutdown;
pub mod state;

pub use config::{FarmConfig, MAX_WALLETS};
pub use error::{ConfigError, MinerError, OrchestratorError};
pub use miner::{FarmMiner, MineOps};
pub use orchestrator::{burn_decision, BurnDecision, Orchestrator, GAS_BUFFER};
pub use shutdown::{ShutdownController, ShutdownSignal};
pub use state::{CycleReport, FarmStats, WalletRuntimeState};
