//! Remote prover client for the WORM farmer.
//!
//! Proof generation is delegated to an external proving service; this
//! crate covers the whole client-side protocol: submit with endpoint
//! failover, poll the job state machine, and enforce the wall-clock
//! timeout. The proof bundle is validated into typed form at the API
//! boundary.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ProverClient, ProverConfig, DEFAULT_PROVERS};
pub use error::ProverError;
pub use types::{Groth16Proof, JobId, ProofBundle, ProofRequest};
