//! Transaction builders for the five protocol operations.
//!
//! Every builder follows the same template: read the network gas price,
//! refuse above the configured ceiling, apply the priority multiplier,
//! assign the next nonce and the chain id, sign with the wallet's key,
//! broadcast, and block until a receipt arrives or the per-operation
//! timeout elapses. Nothing is resubmitted automatically — a failed or
//! stuck transaction surfaces to the caller, and a fresh nonce read
//! happens naturally on the next attempt.

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider};
use alloy::rpc::types::TransactionRequest;

use wormfarm_prover::ProofBundle;
use wormfarm_types::amount::WEI_PER_GWEI;
use wormfarm_types::{BethAmount, EthAmount, ProtocolParams};

use crate::contracts::{pairing_order_b, BethToken, WormPool};
use crate::wallet::Wallet;
use crate::{ChainError, RpcChain};

/// Receipt wait for burn, mint, participate and claim.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(120);

/// Receipt wait for the cheaper approval.
const APPROVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Plain value transfer.
const BURN_GAS: u64 = 21_000;

/// Proof verification is the dominant cost of the mint.
const MINT_GAS: u64 = 500_000;

const APPROVE_GAS: u64 = 60_000;
const CLAIM_GAS: u64 = 300_000;

/// Buffer applied to the live participate gas estimate, in percent.
const ESTIMATE_BUFFER_PERCENT: u64 = 120;

/// A confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Result of [`Transactor::approve_beth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// Current allowance already covers the requested total; no
    /// transaction was issued.
    AlreadyApproved,
    Approved(TxOutcome),
}

/// Builds, signs, submits and confirms protocol transactions.
pub struct Transactor {
    provider: DynProvider,
    beth: BethToken::BethTokenInstance<DynProvider>,
    worm: WormPool::WormPoolInstance<DynProvider>,
    params: ProtocolParams,
}

impl Transactor {
    pub fn new(chain: &RpcChain) -> Self {
        let provider = chain.provider().clone();
        let params = *chain.params();
        let beth = BethToken::new(params.beth_contract, provider.clone());
        let worm = WormPool::new(params.worm_contract, provider.clone());
        Self {
            provider,
            beth,
            worm,
            params,
        }
    }

    /// Gas price for the next transaction: network price checked against
    /// the ceiling, then bumped by the priority multiplier.
    async fn priority_gas_price(&self) -> Result<u128, ChainError> {
        let base = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc(format!("gas price query failed: {e}")))?;

        if base > self.params.max_gas_price_wei {
            return Err(ChainError::FeeTooHigh {
                price_gwei: base / WEI_PER_GWEI,
                max_gwei: self.params.max_gas_price_wei / WEI_PER_GWEI,
            });
        }

        let optimal = self.params.priority_gas_price(base);
        tracing::debug!(
            base_gwei = base / WEI_PER_GWEI,
            optimal_gwei = optimal / WEI_PER_GWEI,
            "gas price"
        );
        Ok(optimal)
    }

    async fn next_nonce(&self, from: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(from)
            .await
            .map_err(|e| ChainError::Rpc(format!("nonce query failed: {e}")))
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Rpc(format!("chain id query failed: {e}")))
    }

    /// Await the receipt for a broadcast transaction and check its status.
    async fn confirm(
        &self,
        op: &'static str,
        pending: PendingTransactionBuilder<alloy::network::Ethereum>,
        timeout: Duration,
    ) -> Result<TxOutcome, ChainError> {
        let tx_hash = *pending.tx_hash();
        tracing::info!(op, %tx_hash, "transaction sent");

        let receipt = pending
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|e| ChainError::Transaction {
                op,
                message: format!("confirmation failed: {e}"),
            })?;

        if !receipt.status() {
            return Err(ChainError::TransactionReverted { op });
        }

        let block_number = receipt.block_number.unwrap_or_default();
        tracing::info!(op, block_number, "transaction confirmed");
        Ok(TxOutcome {
            tx_hash,
            block_number,
        })
    }

    /// Send the burn amount of ETH to the prover-supplied burn address.
    pub async fn send_burn(
        &self,
        wallet: &Wallet,
        burn_address: Address,
        amount: EthAmount,
    ) -> Result<TxOutcome, ChainError> {
        tracing::info!(
            wallet = wallet.name(),
            %amount,
            burn_address = %burn_address,
            "sending ETH to burn address"
        );

        let gas_price = self.priority_gas_price().await?;
        let nonce = self.next_nonce(wallet.address()).await?;
        let chain_id = self.chain_id().await?;

        let tx = TransactionRequest::default()
            .with_from(wallet.address())
            .with_to(burn_address)
            .with_value(amount.to_u256())
            .with_gas_limit(BURN_GAS)
            .with_gas_price(gas_price)
            .with_nonce(nonce)
            .with_chain_id(chain_id);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Transaction {
                op: "burn",
                message: e.to_string(),
            })?;

        self.confirm("burn", pending, CONFIRM_TIMEOUT).await
    }

    /// Mint BETH by submitting the proof bundle to the token contract.
    ///
    /// Consumes the bundle's fields exactly as the prover returned them;
    /// only the `B` point is reordered for the verifier's pairing
    /// convention.
    pub async fn mint_from_proof(
        &self,
        wallet: &Wallet,
        bundle: &ProofBundle,
    ) -> Result<TxOutcome, ChainError> {
        tracing::info!(wallet = wallet.name(), "submitting proof to mint BETH");

        let gas_price = self.priority_gas_price().await?;
        let nonce = self.next_nonce(wallet.address()).await?;
        let chain_id = self.chain_id().await?;

        let pending = self
            .beth
            .mintCoin(
                bundle.proof.a,
                pairing_order_b(bundle.proof.b),
                bundle.proof.c,
                U256::from(bundle.block_number),
                bundle.nullifier,
                bundle.remaining_coin,
                bundle.broadcaster_fee,
                bundle.reveal_amount,
                bundle.receiver,
                bundle.prover_fee,
                bundle.prover,
                Bytes::new(),
                Bytes::new(),
            )
            .from(wallet.address())
            .gas(MINT_GAS)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(chain_id)
            .send()
            .await
            .map_err(|e| ChainError::Transaction {
                op: "mint",
                message: e.to_string(),
            })?;

        self.confirm("mint", pending, CONFIRM_TIMEOUT).await
    }

    /// Current BETH allowance granted to the WORM pool.
    pub async fn beth_allowance(&self, owner: Address) -> Result<U256, ChainError> {
        self.beth
            .allowance(owner, self.params.worm_contract)
            .call()
            .await
            .map_err(|e| ChainError::Rpc(format!("allowance query failed: {e}")))
    }

    /// Approve the WORM pool to spend `total` BETH, unless the current
    /// allowance already covers it.
    pub async fn approve_beth(
        &self,
        wallet: &Wallet,
        total: BethAmount,
    ) -> Result<ApproveOutcome, ChainError> {
        let current = self.beth_allowance(wallet.address()).await?;
        if current >= total.to_u256() {
            tracing::debug!(wallet = wallet.name(), "BETH already approved");
            return Ok(ApproveOutcome::AlreadyApproved);
        }

        tracing::info!(wallet = wallet.name(), %total, "approving BETH for mining");

        let gas_price = self.priority_gas_price().await?;
        let nonce = self.next_nonce(wallet.address()).await?;
        let chain_id = self.chain_id().await?;

        let pending = self
            .beth
            .approve(self.params.worm_contract, total.to_u256())
            .from(wallet.address())
            .gas(APPROVE_GAS)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(chain_id)
            .send()
            .await
            .map_err(|e| ChainError::Transaction {
                op: "approve",
                message: e.to_string(),
            })?;

        let outcome = self.confirm("approve", pending, APPROVE_TIMEOUT).await?;
        Ok(ApproveOutcome::Approved(outcome))
    }

    /// Stake BETH into mining epochs.
    ///
    /// Ensures the pool allowance covers the whole stake first. Gas comes
    /// from a live estimate with a buffer, since participation cost varies
    /// with the pool's epoch state.
    pub async fn participate(
        &self,
        wallet: &Wallet,
        amount_per_epoch: BethAmount,
        num_epochs: u64,
    ) -> Result<TxOutcome, ChainError> {
        let total = amount_per_epoch.saturating_mul(num_epochs as u128);
        self.approve_beth(wallet, total).await?;

        tracing::info!(
            wallet = wallet.name(),
            %amount_per_epoch,
            num_epochs,
            "participating in mining epochs"
        );

        let call = self
            .worm
            .participate(amount_per_epoch.to_u256(), U256::from(num_epochs))
            .from(wallet.address());

        let estimate = call
            .estimate_gas()
            .await
            .map_err(|e| ChainError::Transaction {
                op: "participate",
                message: format!("gas estimation failed: {e}"),
            })?;
        let gas = estimate * ESTIMATE_BUFFER_PERCENT / 100;

        let gas_price = self.priority_gas_price().await?;
        let nonce = self.next_nonce(wallet.address()).await?;
        let chain_id = self.chain_id().await?;

        let pending = call
            .gas(gas)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(chain_id)
            .send()
            .await
            .map_err(|e| ChainError::Transaction {
                op: "participate",
                message: e.to_string(),
            })?;

        self.confirm("participate", pending, CONFIRM_TIMEOUT).await
    }

    /// Claim WORM rewards for a contiguous epoch range.
    pub async fn claim(
        &self,
        wallet: &Wallet,
        starting_epoch: u64,
        num_epochs: u64,
    ) -> Result<TxOutcome, ChainError> {
        tracing::info!(
            wallet = wallet.name(),
            starting_epoch,
            ending_epoch = starting_epoch + num_epochs.saturating_sub(1),
            "claiming WORM rewards"
        );

        let gas_price = self.priority_gas_price().await?;
        let nonce = self.next_nonce(wallet.address()).await?;
        let chain_id = self.chain_id().await?;

        let pending = self
            .worm
            .claim(U256::from(starting_epoch), U256::from(num_epochs))
            .from(wallet.address())
            .gas(CLAIM_GAS)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(chain_id)
            .send()
            .await
            .map_err(|e| ChainError::Transaction {
                op: "claim",
                message: e.to_string(),
            })?;

        self.confirm("claim", pending, CONFIRM_TIMEOUT).await
    }
}
