//! Typed request/response payloads for the prover HTTP API.
//!
//! The API speaks decimal strings for every field-sized number; parsing
//! into `U256`/`Address` happens once at this boundary and the rest of the
//! farmer only sees validated values.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProverError;

/// Opaque identifier of a proof job on the remote prover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    /// Short prefix form for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "{prefix}...")
    }
}

/// Body of `POST /proof`.
#[derive(Clone, Debug, Serialize)]
pub struct ProofRequest {
    pub network: String,
    /// ETH burned, decimal ether string.
    pub amount: String,
    pub broadcaster_fee: String,
    pub prover_fee: String,
    /// BETH minted, decimal ether string.
    pub spend: String,
    /// Burn key as a decimal field element.
    pub burn_key: String,
    pub wallet_address: String,
    pub receiver_hook: String,
    /// Optional EIP-1186 account proof for re-submission flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Groth16 proof triple in the prover's natural coordinate order.
///
/// The pairing-convention swap required by the on-chain verifier is applied
/// at transaction encoding time, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
}

/// A completed proof, consumed exactly once by the mint transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofBundle {
    pub burn_address: Address,
    pub proof: Groth16Proof,
    pub block_number: u64,
    /// Opaque one-time value computed server-side; never recomputed locally.
    pub nullifier: U256,
    pub remaining_coin: U256,
    pub broadcaster_fee: U256,
    pub prover_fee: U256,
    pub prover: Address,
    pub reveal_amount: U256,
    pub receiver: Address,
}

// ── Wire formats ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<SubmitResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResult {
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<ProofBundleWire>,
}

/// `result` payload of a completed job, all numbers as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct ProofBundleWire {
    pub burn_address: String,
    pub proof: ProofWire,
    pub block_number: u64,
    pub nullifier_u256: String,
    pub remaining_coin: String,
    pub broadcaster_fee: String,
    pub prover_fee: String,
    pub prover: String,
    pub reveal_amount: String,
    pub wallet_address: String,
}

/// snarkjs-style proof points (projective, third coordinate ignored).
#[derive(Debug, Deserialize)]
pub(crate) struct ProofWire {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
}

fn parse_u256(field: &str, value: &str) -> Result<U256, ProverError> {
    U256::from_str_radix(value.trim(), 10)
        .map_err(|e| ProverError::InvalidBundle(format!("{field}: {e}")))
}

fn parse_address(field: &str, value: &str) -> Result<Address, ProverError> {
    value
        .trim()
        .parse()
        .map_err(|e| ProverError::InvalidBundle(format!("{field}: {e}")))
}

fn parse_pair(field: &str, coords: &[String]) -> Result<[U256; 2], ProverError> {
    if coords.len() < 2 {
        return Err(ProverError::InvalidBundle(format!(
            "{field}: expected at least 2 coordinates, got {}",
            coords.len()
        )));
    }
    Ok([parse_u256(field, &coords[0])?, parse_u256(field, &coords[1])?])
}

impl TryFrom<ProofBundleWire> for ProofBundle {
    type Error = ProverError;

    fn try_from(wire: ProofBundleWire) -> Result<Self, Self::Error> {
        if wire.proof.pi_b.len() < 2 {
            return Err(ProverError::InvalidBundle(format!(
                "pi_b: expected at least 2 rows, got {}",
                wire.proof.pi_b.len()
            )));
        }

        Ok(ProofBundle {
            burn_address: parse_address("burn_address", &wire.burn_address)?,
            proof: Groth16Proof {
                a: parse_pair("pi_a", &wire.proof.pi_a)?,
                b: [
                    parse_pair("pi_b[0]", &wire.proof.pi_b[0])?,
                    parse_pair("pi_b[1]", &wire.proof.pi_b[1])?,
                ],
                c: parse_pair("pi_c", &wire.proof.pi_c)?,
            },
            block_number: wire.block_number,
            nullifier: parse_u256("nullifier_u256", &wire.nullifier_u256)?,
            remaining_coin: parse_u256("remaining_coin", &wire.remaining_coin)?,
            broadcaster_fee: parse_u256("broadcaster_fee", &wire.broadcaster_fee)?,
            prover_fee: parse_u256("prover_fee", &wire.prover_fee)?,
            prover: parse_address("prover", &wire.prover)?,
            reveal_amount: parse_u256("reveal_amount", &wire.reveal_amount)?,
            receiver: parse_address("wallet_address", &wire.wallet_address)?,
        })
    }
}
