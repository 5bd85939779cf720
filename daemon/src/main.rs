//! WORM farmer daemon — entry point for the multi-wallet farming loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use wormfarm_chain::{RpcChain, Transactor};
use wormfarm_orchestrator::{
    FarmConfig, FarmMiner, Orchestrator, ShutdownController, MAX_WALLETS,
};
use wormfarm_prover::{ProverClient, ProverConfig};
use wormfarm_types::ProtocolParams;
use wormfarm_utils::{init_logging, LogFormat, RetryPolicy};

#[derive(Parser)]
#[command(name = "wormfarm-daemon", about = "WORM multi-wallet farming daemon")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, default_value = "wormfarm.toml", env = "WORMFARM_CONFIG")]
    config: PathBuf,

    /// Blockchain RPC URL (overrides the config file).
    #[arg(long, env = "WORMFARM_RPC_URL")]
    rpc_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "WORMFARM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "WORMFARM_LOG_FORMAT")]
    log_format: Option<String>,

    /// Validate configuration and exit without running.
    #[arg(long)]
    dry_run: bool,

    /// Run a single farming cycle then exit.
    #[arg(long)]
    once: bool,

    /// Shorthand for --log-level debug.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the farming loop (default).
    Run,

    /// Claim WORM rewards for a contiguous epoch range, then exit.
    Claim {
        /// First epoch to claim.
        #[arg(long)]
        starting_epoch: u64,

        /// Number of epochs to claim (defaults to the configured
        /// claim_interval).
        #[arg(long)]
        num_epochs: Option<u64>,

        /// 1-based index of the wallet to claim with.
        #[arg(long, default_value_t = 1)]
        wallet: usize,
    },
}

/// File config, overridden by CLI flags and `WORMFARM_PK1..=PK5` env vars.
fn load_config(cli: &Cli) -> anyhow::Result<FarmConfig> {
    let mut config = FarmConfig::from_toml_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if cli.debug {
        config.log_level = "debug".to_string();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }

    let env_keys: Vec<String> = (1..=MAX_WALLETS)
        .filter_map(|i| std::env::var(format!("WORMFARM_PK{i}")).ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect();
    if !env_keys.is_empty() {
        config.wallet_keys = env_keys;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_prover(config: &FarmConfig) -> anyhow::Result<ProverClient> {
    let prover_config = ProverConfig {
        primary_url: (!config.prover_url.is_empty()).then(|| config.prover_url.clone()),
        backup_urls: (!config.prover_backup_url.is_empty())
            .then(|| config.prover_backup_url.clone())
            .into_iter()
            .collect(),
        timeout: Duration::from_secs(config.prover_timeout_seconds),
        poll_interval: Duration::from_secs(5),
    };
    ProverClient::new(prover_config).context("building prover client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(LogFormat::parse(&config.log_format), &config.log_level);

    let wallets = config.wallets().context("loading wallets")?;
    let params = ProtocolParams::sepolia();

    if cli.dry_run {
        config.log_summary(&wallets);
        tracing::info!("configuration OK (dry run)");
        return Ok(());
    }

    let retry = RetryPolicy::new(
        config.max_retries,
        Duration::from_secs(config.retry_delay_seconds),
    );
    let chain = RpcChain::connect(&config.rpc_url, &wallets, params, retry)
        .context("connecting to blockchain RPC")?;
    let transactor = Transactor::new(&chain);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let (total_beth, total_worm) = chain.protocol_totals().await;
            if let (Some(beth), Some(worm)) = (total_beth, total_worm) {
                tracing::info!(total_beth = %beth, total_worm = %worm, "protocol totals");
            }

            let prover = build_prover(&config)?;
            let miner = FarmMiner::new(
                config.network.clone(),
                params.pow_zero_bytes,
                prover,
                transactor,
            );

            let controller = Arc::new(ShutdownController::new());
            let signal = controller.subscribe();
            let signal_task = controller.clone();
            tokio::spawn(async move {
                signal_task.wait_for_signal().await;
            });

            let mut orchestrator =
                Orchestrator::new(config, chain, miner, wallets, signal);

            if cli.once {
                let report = orchestrator.run_cycle().await?;
                tracing::info!(
                    ok = report.successes,
                    total = report.processed,
                    "single cycle finished"
                );
            } else {
                orchestrator.run().await?;
            }
            tracing::info!("wormfarm daemon exited cleanly");
        }
        Command::Claim {
            starting_epoch,
            num_epochs,
            wallet,
        } => {
            let num_epochs = num_epochs.unwrap_or(config.claim_interval);
            let wallet = wallets
                .get(wallet.saturating_sub(1))
                .with_context(|| format!("no wallet at index {wallet}"))?;

            let outcome = transactor
                .claim(wallet, starting_epoch, num_epochs)
                .await
                .context("claim failed")?;
            tracing::info!(
                tx_hash = %outcome.tx_hash,
                block_number = outcome.block_number,
                "claim confirmed"
            );
        }
    }

    Ok(())
}
