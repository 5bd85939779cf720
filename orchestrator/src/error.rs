use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum MinerError {
    #[error(transparent)]
    Work(#[from] wormfarm_work::WorkError),

    #[error(transparent)]
    Prover(#[from] wormfarm_prover::ProverError),

    #[error(transparent)]
    Chain(#[from] wormfarm_chain::ChainError),

    #[error("runtime error: {0}")]
    Runtime(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("failed to connect to the blockchain RPC")]
    ChainUnreachable,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
