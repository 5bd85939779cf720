//! The multi-wallet farming loop.
//!
//! One cycle walks every wallet in configured order: refresh balances,
//! gate on consecutive failures, burn if BETH is short and ETH covers the
//! budget, then stake exactly one epoch. Wallets are strictly sequential —
//! each owns its key and nonce sequence exclusively, so no two operations
//! for the same wallet are ever in flight at once.

use std::time::{Duration, Instant};

use wormfarm_chain::{ChainReader, Wallet, WalletBalances};
use wormfarm_types::{BethAmount, BurnRequest, EthAmount};
use wormfarm_utils::format_duration;

use crate::config::FarmConfig;
use crate::miner::MineOps;
use crate::shutdown::ShutdownSignal;
use crate::state::{CycleReport, FarmStats, WalletRuntimeState};
use crate::OrchestratorError;

/// ETH headroom kept for gas on top of the burn budget.
pub const GAS_BUFFER: EthAmount = EthAmount::from_wei(10_000_000_000_000_000); // 0.01 ETH

/// Fixed pause after an unexpected cycle error.
const ERROR_COOLDOWN_SECS: u64 = 30;

/// Wait for the mint to propagate before re-reading balances.
const POST_BURN_DELAY: Duration = Duration::from_secs(2);

/// Why a wallet did or did not burn this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurnDecision {
    /// BETH below one epoch's stake and ETH covers budget plus gas.
    Burn,
    /// BETH already covers at least one epoch.
    TokenSufficient,
    /// Not enough ETH for the burn budget plus the gas buffer.
    InsufficientEth { needed: EthAmount },
}

/// Decide whether a wallet needs to burn this cycle.
///
/// Burning only tops BETH up to one epoch's requirement; a wallet holding
/// enough BETH never burns regardless of its ETH balance.
pub fn burn_decision(
    balances: &WalletBalances,
    beth_per_epoch: BethAmount,
    burn_budget: EthAmount,
) -> BurnDecision {
    if balances.beth >= beth_per_epoch {
        return BurnDecision::TokenSufficient;
    }
    let needed = EthAmount::from_wei(burn_budget.wei().saturating_add(GAS_BUFFER.wei()));
    if balances.eth < needed {
        return BurnDecision::InsufficientEth { needed };
    }
    BurnDecision::Burn
}

/// Drives the farming loop across all configured wallets.
pub struct Orchestrator<C, M> {
    config: FarmConfig,
    chain: C,
    miner: M,
    wallets: Vec<Wallet>,
    states: Vec<WalletRuntimeState>,
    stats: FarmStats,
    shutdown: ShutdownSignal,
}

impl<C: ChainReader, M: MineOps> Orchestrator<C, M> {
    pub fn new(
        config: FarmConfig,
        chain: C,
        miner: M,
        wallets: Vec<Wallet>,
        shutdown: ShutdownSignal,
    ) -> Self {
        let states = wallets
            .iter()
            .map(|w| WalletRuntimeState::new(w.address(), w.name().to_string()))
            .collect();
        Self {
            config,
            chain,
            miner,
            wallets,
            states,
            stats: FarmStats::new(),
            shutdown,
        }
    }

    pub fn wallet_states(&self) -> &[WalletRuntimeState] {
        &self.states
    }

    pub fn stats(&self) -> &FarmStats {
        &self.stats
    }

    /// Run the farming loop until shutdown is requested.
    pub async fn run(&mut self) -> Result<(), OrchestratorError> {
        self.config.log_summary(&self.wallets);

        tracing::info!("verifying connections");
        if !self.chain.check_connection().await {
            tracing::error!("failed to connect to blockchain RPC");
            return Err(OrchestratorError::ChainUnreachable);
        }
        tracing::info!("blockchain connection OK");

        if self.miner.check_prover().await {
            tracing::info!("prover connection OK");
        } else {
            tracing::warn!("prover health check failed, will retry on first use");
        }

        tracing::info!("starting farming loop");
        while !self.shutdown.is_shutdown() {
            if let Err(e) = self.run_cycle().await {
                tracing::error!(error = %e, "unexpected error in farming cycle, continuing");
                self.sleep_interruptible(ERROR_COOLDOWN_SECS).await;
                continue;
            }

            if self.shutdown.is_shutdown() {
                break;
            }
            tracing::info!(
                seconds = self.config.loop_interval_seconds,
                "sleeping until next cycle"
            );
            self.sleep_interruptible(self.config.loop_interval_seconds).await;
        }

        self.log_shutdown_summary();
        Ok(())
    }

    /// Run one complete cycle across all wallets.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, OrchestratorError> {
        self.stats.cycle_count += 1;
        let cycle_start = Instant::now();

        let (epoch, remaining) = self.chain.epoch_info().await;
        tracing::info!(
            cycle = self.stats.cycle_count,
            wallets = self.wallets.len(),
            current_epoch = ?epoch,
            epoch_remaining_secs = ?remaining,
            "cycle start"
        );

        let mut successes = 0;
        let mut processed = 0;
        for index in 0..self.wallets.len() {
            if self.shutdown.is_shutdown() {
                tracing::info!("shutdown requested, stopping cycle");
                break;
            }
            processed += 1;
            if self.process_wallet(index).await {
                successes += 1;
            }
        }

        tracing::info!(
            cycle = self.stats.cycle_count,
            duration_secs = cycle_start.elapsed().as_secs(),
            ok = successes,
            total = self.wallets.len(),
            total_burns = self.stats.total_burns,
            total_mines = self.stats.total_mines,
            "cycle complete"
        );

        Ok(CycleReport {
            successes,
            processed,
        })
    }

    /// Process one wallet: refresh, gate, burn if needed, mine one epoch.
    ///
    /// Returns true when every operation the wallet needed succeeded.
    async fn process_wallet(&mut self, index: usize) -> bool {
        let wallet = self.wallets[index].clone();
        tracing::info!(
            wallet = wallet.name(),
            address = %wallet.short_address(),
            "processing wallet"
        );

        self.refresh_balances(index).await;

        let state = &self.states[index];
        if state.consecutive_failures >= self.config.max_retries {
            tracing::error!(
                wallet = wallet.name(),
                failures = state.consecutive_failures,
                last_error = state.last_error.as_deref().unwrap_or("none"),
                "skipping wallet after consecutive failures"
            );
            return false;
        }

        let balances = state.balances;
        match burn_decision(
            &balances,
            self.config.beth_per_epoch,
            self.config.total_eth_budget,
        ) {
            BurnDecision::Burn => {
                tracing::info!(
                    beth = %balances.beth,
                    per_epoch = %self.config.beth_per_epoch,
                    budget = %self.config.total_eth_budget,
                    "BETH below one epoch, burning"
                );

                let request = match BurnRequest::new(
                    self.config.total_eth_budget,
                    self.config.burn_fee,
                    wallet.address(),
                ) {
                    Ok(request) => request,
                    Err(e) => {
                        tracing::error!(error = %e, "invalid burn request");
                        self.states[index].record_failure(&e);
                        return false;
                    }
                };

                let burn_result = self.miner.burn(&wallet, &request).await;
                match burn_result {
                    Ok(_) => {
                        let state = &mut self.states[index];
                        state.last_burn_at = Some(Instant::now());
                        state.burns_count += 1;
                        self.stats.total_burns += 1;

                        // Do not mine against a balance that may not have
                        // caught up with the mint yet.
                        tokio::time::sleep(POST_BURN_DELAY).await;
                        self.refresh_balances(index).await;
                    }
                    Err(e) => {
                        tracing::error!(wallet = wallet.name(), error = %e, "burn failed");
                        self.states[index].record_failure(&e);
                        return false;
                    }
                }
            }
            BurnDecision::TokenSufficient => {
                tracing::info!(beth = %balances.beth, "sufficient BETH, skipping burn");
            }
            BurnDecision::InsufficientEth { needed } => {
                tracing::warn!(
                    eth = %balances.eth,
                    needed = %needed,
                    "insufficient ETH for burn, skipping"
                );
            }
        }

        // Mine exactly one epoch per cycle, never more.
        let balances = self.states[index].balances;
        if balances.beth < self.config.beth_per_epoch {
            tracing::warn!(
                beth = %balances.beth,
                needed = %self.config.beth_per_epoch,
                "insufficient BETH for one epoch, ending wallet cycle"
            );
            return false;
        }

        tracing::info!(beth = %balances.beth, "participating in one epoch");
        let mine_result = self.miner.mine(&wallet, self.config.beth_per_epoch, 1).await;
        match mine_result {
            Ok(_) => {
                let state = &mut self.states[index];
                state.last_mine_at = Some(Instant::now());
                state.mines_count += 1;
                state.consecutive_failures = 0;
                self.stats.total_mines += 1;
                true
            }
            Err(e) => {
                tracing::error!(wallet = wallet.name(), error = %e, "mine failed");
                self.states[index].record_failure(&e);
                false
            }
        }
    }

    /// Refresh one wallet's balances. A successful read clears the
    /// failure counter; a failed read increments it without aborting the
    /// cycle.
    async fn refresh_balances(&mut self, index: usize) {
        let address = self.states[index].address;
        match self.chain.all_balances(address).await {
            Ok(balances) => {
                let state = &mut self.states[index];
                state.balances = balances;
                state.consecutive_failures = 0;
                tracing::info!(
                    wallet = state.name.as_str(),
                    eth = %balances.eth,
                    beth = %balances.beth,
                    worm = %balances.worm,
                    "balances"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to get balances");
                self.states[index].record_failure(&e);
            }
        }
    }

    /// Sleep in one-second ticks, waking early on shutdown.
    async fn sleep_interruptible(&mut self, secs: u64) {
        for _ in 0..secs {
            if self.shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = self.shutdown.requested() => break,
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
        }
    }

    fn log_shutdown_summary(&self) {
        let runtime_secs = self.stats.started_at.elapsed().as_secs();
        tracing::info!(
            runtime = %format_duration(runtime_secs),
            cycles = self.stats.cycle_count,
            total_burns = self.stats.total_burns,
            total_mines = self.stats.total_mines,
            "farmer shutdown summary"
        );
        for state in &self.states {
            tracing::info!(
                wallet = state.name.as_str(),
                burns = state.burns_count,
                mines = state.mines_count,
                beth = %state.balances.beth,
                "wallet summary"
            );
        }
    }
}
