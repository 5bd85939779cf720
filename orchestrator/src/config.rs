//! Farming configuration with TOML file support.
//!
//! Amount fields are written as decimal ether strings in the file
//! (`total_eth_budget = "0.05"`) and parsed into wei at load time. Wallet
//! keys may come from the file or from `WORMFARM_PK1..=PK5` environment
//! variables; the daemon layers env values over the file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use wormfarm_chain::Wallet;
use wormfarm_types::{BethAmount, EthAmount};

use crate::ConfigError;

/// Maximum number of configured wallets.
pub const MAX_WALLETS: usize = 5;

/// Complete farming configuration.
///
/// Loadable from a TOML file via [`FarmConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmConfig {
    /// JSON-RPC endpoint of the target network.
    pub rpc_url: String,

    /// Network name passed to the remote prover.
    #[serde(default = "default_network")]
    pub network: String,

    /// Wallet private keys (hex, `0x` prefix optional). Never serialized.
    #[serde(default, skip_serializing)]
    pub wallet_keys: Vec<String>,

    /// Total ETH burned per burn operation.
    #[serde(default = "default_eth_budget", with = "eth_amount_serde")]
    pub total_eth_budget: EthAmount,

    /// BETH staked per epoch.
    #[serde(default = "default_beth_per_epoch", with = "beth_amount_serde")]
    pub beth_per_epoch: BethAmount,

    /// Claim rewards every N epochs (manual `claim` subcommand input).
    #[serde(default = "default_claim_interval")]
    pub claim_interval: u64,

    /// Protocol fee deducted from each burn.
    #[serde(default = "default_burn_fee", with = "eth_amount_serde")]
    pub burn_fee: EthAmount,

    /// Seconds between farming cycles.
    #[serde(default = "default_loop_interval")]
    pub loop_interval_seconds: u64,

    /// Consecutive failures before a wallet is skipped for the cycle.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for balance-read retries.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Preferred prover endpoint; public defaults are used when empty.
    #[serde(default)]
    pub prover_url: String,

    /// Fallback prover endpoint tried after the primary.
    #[serde(default)]
    pub prover_backup_url: String,

    /// Wall-clock budget for one proof generation.
    #[serde(default = "default_prover_timeout")]
    pub prover_timeout_seconds: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> String {
    "sepolia".to_string()
}

fn default_eth_budget() -> EthAmount {
    EthAmount::from_wei(50_000_000_000_000_000) // 0.05 ETH
}

fn default_beth_per_epoch() -> BethAmount {
    BethAmount::from_wei(1_000_000_000_000_000) // 0.001 BETH
}

fn default_claim_interval() -> u64 {
    5
}

fn default_burn_fee() -> EthAmount {
    EthAmount::from_wei(10_000_000_000_000) // 0.00001 ETH
}

fn default_loop_interval() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    30
}

fn default_prover_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl FarmConfig {
    /// Parse a configuration from a TOML file.
    ///
    /// Validation is separate: the daemon applies environment overrides
    /// (wallet keys in particular) before calling [`FarmConfig::validate`].
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    }

    /// Check every configuration invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.is_empty() {
            return Err(ConfigError::Invalid("rpc_url is required".into()));
        }
        if self.wallet_keys.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one wallet private key is required".into(),
            ));
        }
        if self.wallet_keys.len() > MAX_WALLETS {
            return Err(ConfigError::Invalid(format!(
                "at most {MAX_WALLETS} wallets are supported, got {}",
                self.wallet_keys.len()
            )));
        }
        if self.total_eth_budget.is_zero() {
            return Err(ConfigError::Invalid(
                "total_eth_budget must be positive".into(),
            ));
        }
        if self.beth_per_epoch.is_zero() {
            return Err(ConfigError::Invalid(
                "beth_per_epoch must be positive".into(),
            ));
        }
        if self.burn_fee >= self.total_eth_budget {
            return Err(ConfigError::Invalid(
                "burn_fee must be less than total_eth_budget".into(),
            ));
        }
        if !(1..=100).contains(&self.claim_interval) {
            return Err(ConfigError::Invalid(
                "claim_interval must be between 1 and 100".into(),
            ));
        }
        if !(60..=3600).contains(&self.loop_interval_seconds) {
            return Err(ConfigError::Invalid(
                "loop_interval_seconds must be between 60 and 3600".into(),
            ));
        }
        if !(1..=10).contains(&self.max_retries) {
            return Err(ConfigError::Invalid(
                "max_retries must be between 1 and 10".into(),
            ));
        }
        Ok(())
    }

    /// BETH received from one burn: budget minus fee.
    pub fn burn_spend(&self) -> BethAmount {
        BethAmount::from_wei(
            self.total_eth_budget
                .wei()
                .saturating_sub(self.burn_fee.wei()),
        )
    }

    /// How many epochs one burn funds.
    pub fn epochs_per_burn(&self) -> u64 {
        if self.beth_per_epoch.is_zero() {
            return 0;
        }
        (self.burn_spend().wei() / self.beth_per_epoch.wei()) as u64
    }

    /// Build the wallet set from the configured keys.
    pub fn wallets(&self) -> Result<Vec<Wallet>, ConfigError> {
        self.wallet_keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Wallet::from_private_key(key, i)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))
            })
            .collect()
    }

    /// Log a human-readable summary, with the RPC key masked.
    pub fn log_summary(&self, wallets: &[Wallet]) {
        tracing::info!("── WORM multi-wallet farmer ──");
        tracing::info!(rpc = %wormfarm_utils::mask_rpc_url(&self.rpc_url), network = %self.network, "network");
        for wallet in wallets {
            tracing::info!(name = wallet.name(), address = %wallet.short_address(), "wallet");
        }
        tracing::info!(
            budget = %self.total_eth_budget,
            spend = %self.burn_spend(),
            epochs_per_burn = self.epochs_per_burn(),
            per_epoch = %self.beth_per_epoch,
            "budget"
        );
        tracing::info!(
            claim_interval = self.claim_interval,
            loop_interval_secs = self.loop_interval_seconds,
            "mining"
        );
        if self.prover_url.is_empty() {
            tracing::info!("prover: public endpoints");
        } else {
            tracing::info!(prover = %self.prover_url, "prover");
        }
    }
}

macro_rules! amount_serde {
    ($module:ident, $ty:ty) => {
        mod $module {
            use serde::{Deserialize, Deserializer, Serializer};

            pub fn serialize<S: Serializer>(
                amount: &$ty,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&wormfarm_types::format_ether(amount.wei()))
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(
                deserializer: D,
            ) -> Result<$ty, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

amount_serde!(eth_amount_serde, wormfarm_types::EthAmount);
amount_serde!(beth_amount_serde, wormfarm_types::BethAmount);
