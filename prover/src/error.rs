use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("all prover endpoints failed, last error: {last_error}")]
    AllEndpointsFailed { last_error: String },

    #[error("proof generation failed: {0}")]
    ProofRejected(String),

    #[error("proof generation timed out after {elapsed_secs}s")]
    ProofTimeout { elapsed_secs: u64 },

    #[error("prover request failed: {0}")]
    Transport(String),

    #[error("malformed prover response: {0}")]
    MalformedResponse(String),

    #[error("invalid proof bundle: {0}")]
    InvalidBundle(String),
}
