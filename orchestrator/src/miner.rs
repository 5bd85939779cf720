//! The composed burn/mine/claim operations.
//!
//! `burn` is the full flow: proof-of-work key search, remote proof
//! generation, then the burn transfer and mint transactions in order.
//! `mine` and `claim` are direct contract calls and need no prover.

use std::time::Instant;

use alloy_primitives::U256;

use wormfarm_chain::{Transactor, TxOutcome, Wallet};
use wormfarm_crypto::derive_commitment;
use wormfarm_prover::{ProofRequest, ProverClient};
use wormfarm_types::{format_ether, BethAmount, BurnRequest};
use wormfarm_work::search_burn_key;

use crate::MinerError;

/// Operations the cycle loop performs per wallet. The orchestrator is
/// written against this trait so tests can substitute a recording fake.
#[allow(async_fn_in_trait)]
pub trait MineOps {
    async fn burn(&self, wallet: &Wallet, request: &BurnRequest) -> Result<TxOutcome, MinerError>;
    async fn mine(
        &self,
        wallet: &Wallet,
        amount_per_epoch: BethAmount,
        num_epochs: u64,
    ) -> Result<TxOutcome, MinerError>;
    async fn claim(
        &self,
        wallet: &Wallet,
        starting_epoch: u64,
        num_epochs: u64,
    ) -> Result<TxOutcome, MinerError>;
    async fn check_prover(&self) -> bool;
}

/// Production miner backed by the remote prover and the chain transactor.
pub struct FarmMiner {
    network: String,
    pow_zero_bytes: usize,
    prover: ProverClient,
    transactor: Transactor,
}

impl FarmMiner {
    pub fn new(
        network: String,
        pow_zero_bytes: usize,
        prover: ProverClient,
        transactor: Transactor,
    ) -> Self {
        Self {
            network,
            pow_zero_bytes,
            prover,
            transactor,
        }
    }
}

impl MineOps for FarmMiner {
    /// Full burn flow: burn key → proof → burn transfer → mint.
    async fn burn(&self, wallet: &Wallet, request: &BurnRequest) -> Result<TxOutcome, MinerError> {
        let started = Instant::now();
        tracing::info!(
            wallet = wallet.name(),
            amount = %request.amount,
            spend = %request.spend,
            "starting burn"
        );

        // Key search is pure CPU work; keep it off the async executor.
        let difficulty = self.pow_zero_bytes;
        let receiver = request.receiver;
        let reveal = U256::from(request.spend.wei());
        tracing::info!(wallet = wallet.name(), "searching burn key");
        let (burn_key, _commitment) = tokio::task::spawn_blocking(move || {
            let commitment = derive_commitment(receiver, U256::ZERO, U256::ZERO, &[]);
            search_burn_key(difficulty, commitment, reveal).map(|key| (key, commitment))
        })
        .await
        .map_err(|e| MinerError::Runtime(e.to_string()))??;
        tracing::debug!(burn_key = %burn_key.to_decimal_string(), "burn key found");

        let proof_request = ProofRequest {
            network: self.network.clone(),
            amount: format_ether(request.amount.wei()),
            broadcaster_fee: "0".into(),
            prover_fee: "0".into(),
            spend: format_ether(request.spend.wei()),
            burn_key: burn_key.to_decimal_string(),
            wallet_address: request.receiver.to_checksum(None),
            receiver_hook: "0x".into(),
            proof: None,
            block_number: None,
        };

        tracing::info!(wallet = wallet.name(), "requesting proof from remote prover");
        let bundle = self.prover.generate(&proof_request).await?;
        tracing::info!(burn_address = %bundle.burn_address, "proof generated");

        self.transactor
            .send_burn(wallet, bundle.burn_address, request.amount)
            .await?;

        let outcome = self.transactor.mint_from_proof(wallet, &bundle).await?;

        tracing::info!(
            wallet = wallet.name(),
            minted = %request.spend,
            elapsed_secs = started.elapsed().as_secs(),
            "burn complete"
        );
        Ok(outcome)
    }

    /// Stake BETH into mining epochs. Direct contract call, no prover.
    async fn mine(
        &self,
        wallet: &Wallet,
        amount_per_epoch: BethAmount,
        num_epochs: u64,
    ) -> Result<TxOutcome, MinerError> {
        let outcome = self
            .transactor
            .participate(wallet, amount_per_epoch, num_epochs)
            .await?;
        Ok(outcome)
    }

    /// Claim WORM rewards. Direct contract call, no prover.
    async fn claim(
        &self,
        wallet: &Wallet,
        starting_epoch: u64,
        num_epochs: u64,
    ) -> Result<TxOutcome, MinerError> {
        let outcome = self
            .transactor
            .claim(wallet, starting_epoch, num_epochs)
            .await?;
        Ok(outcome)
    }

    async fn check_prover(&self) -> bool {
        self.prover.check_health().await
    }
}
