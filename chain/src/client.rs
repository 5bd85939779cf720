//! RPC chain client — provider construction and read operations.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};

use wormfarm_types::{BethAmount, EthAmount, ProtocolParams, WormAmount};
use wormfarm_utils::{retry_with_backoff, RetryPolicy};

use crate::contracts::{BethToken, WormPool};
use crate::wallet::Wallet;
use crate::ChainError;

/// One wallet's balances as of a single refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalletBalances {
    pub eth: EthAmount,
    pub beth: BethAmount,
    pub worm: WormAmount,
}

/// Read capabilities the orchestrator depends on.
///
/// The cycle loop is written against this trait rather than the concrete
/// RPC client so tests can substitute an in-memory chain.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    async fn all_balances(&self, address: Address) -> Result<WalletBalances, ChainError>;
    async fn check_connection(&self) -> bool;
    /// `(current_epoch, seconds_remaining)` — both best-effort.
    async fn epoch_info(&self) -> (Option<u64>, Option<u64>);
}

/// JSON-RPC chain client with all wallet signers registered.
pub struct RpcChain {
    provider: DynProvider,
    beth: BethToken::BethTokenInstance<DynProvider>,
    worm: WormPool::WormPoolInstance<DynProvider>,
    params: ProtocolParams,
    retry: RetryPolicy,
}

impl RpcChain {
    /// Connect to `rpc_url` with every wallet's signer registered, so a
    /// transaction's `from` field selects the signing key.
    pub fn connect(
        rpc_url: &str,
        wallets: &[Wallet],
        params: ProtocolParams,
        retry: RetryPolicy,
    ) -> Result<Self, ChainError> {
        let url = rpc_url
            .parse()
            .map_err(|e| ChainError::Rpc(format!("invalid RPC URL: {e}")))?;

        let mut iter = wallets.iter();
        let first = iter
            .next()
            .ok_or_else(|| ChainError::Rpc("at least one wallet is required".into()))?;
        let mut signer_set = EthereumWallet::new(first.signer().clone());
        for wallet in iter {
            signer_set.register_signer(wallet.signer().clone());
        }

        let provider = ProviderBuilder::new().wallet(signer_set).connect_http(url).erased();

        let beth = BethToken::new(params.beth_contract, provider.clone());
        let worm = WormPool::new(params.worm_contract, provider.clone());

        Ok(Self {
            provider,
            beth,
            worm,
            params,
            retry,
        })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    // ── Balances (backoff-retried reads) ────────────────────────────────

    pub async fn eth_balance(&self, address: Address) -> Result<EthAmount, ChainError> {
        let raw = retry_with_backoff(self.retry, "eth_balance", || async {
            self.provider.get_balance(address).await
        })
        .await?;
        Ok(EthAmount::from_u256_saturating(raw))
    }

    pub async fn beth_balance(&self, address: Address) -> Result<BethAmount, ChainError> {
        let raw = retry_with_backoff(self.retry, "beth_balance", || async {
            self.beth.balanceOf(address).call().await
        })
        .await?;
        Ok(BethAmount::from_u256_saturating(raw))
    }

    pub async fn worm_balance(&self, address: Address) -> Result<WormAmount, ChainError> {
        let raw = retry_with_backoff(self.retry, "worm_balance", || async {
            self.worm.balanceOf(address).call().await
        })
        .await?;
        Ok(WormAmount::from_u256_saturating(raw))
    }

    // ── Network state ───────────────────────────────────────────────────

    /// Current network gas price in wei.
    pub async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc(format!("gas price query failed: {e}")))
    }

    // ── Protocol state (best-effort reads) ──────────────────────────────

    pub async fn current_epoch(&self) -> Option<u64> {
        match self.worm.currentEpoch().call().await {
            Ok(epoch) => u64::try_from(epoch).ok(),
            Err(e) => {
                tracing::debug!(error = %e, "could not fetch current epoch");
                None
            }
        }
    }

    pub async fn epoch_remaining_time(&self) -> Option<u64> {
        match self.worm.epochRemainingTime().call().await {
            Ok(secs) => u64::try_from(secs).ok(),
            Err(_) => None,
        }
    }

    /// Protocol-wide totals: `(total BETH minted, total WORM distributed)`.
    pub async fn protocol_totals(&self) -> (Option<BethAmount>, Option<WormAmount>) {
        let beth = match self.worm.totalBeth().call().await {
            Ok(raw) => Some(BethAmount::from_u256_saturating(raw)),
            Err(e) => {
                tracing::debug!(error = %e, "could not fetch totalBeth");
                None
            }
        };
        let worm = match self.worm.totalWorm().call().await {
            Ok(raw) => Some(WormAmount::from_u256_saturating(raw)),
            Err(e) => {
                tracing::debug!(error = %e, "could not fetch totalWorm");
                None
            }
        };
        (beth, worm)
    }
}

impl ChainReader for RpcChain {
    async fn all_balances(&self, address: Address) -> Result<WalletBalances, ChainError> {
        let eth = self.eth_balance(address).await?;
        let beth = self.beth_balance(address).await?;
        let worm = self.worm_balance(address).await?;
        Ok(WalletBalances { eth, beth, worm })
    }

    async fn check_connection(&self) -> bool {
        let chain_id = match self.provider.get_chain_id().await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "RPC connection check failed");
                return false;
            }
        };
        match self.provider.get_block_number().await {
            Ok(block) => {
                tracing::debug!(chain_id, block, "connected");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "RPC connection check failed");
                false
            }
        }
    }

    async fn epoch_info(&self) -> (Option<u64>, Option<u64>) {
        (self.current_epoch().await, self.epoch_remaining_time().await)
    }
}
