//! Runtime state tracked across farming cycles.

use std::time::Instant;

use alloy_primitives::Address;
use wormfarm_chain::WalletBalances;

/// Mutable per-wallet record, created at orchestrator start and mutated
/// every cycle. Never persisted across restarts.
#[derive(Clone, Debug)]
pub struct WalletRuntimeState {
    pub address: Address,
    pub name: String,

    /// Last observed balances.
    pub balances: WalletBalances,

    pub last_burn_at: Option<Instant>,
    pub last_mine_at: Option<Instant>,
    pub burns_count: u64,
    pub mines_count: u64,

    /// Reset to zero on any successful balance read or mine; incremented
    /// on failures, never otherwise decremented.
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl WalletRuntimeState {
    pub fn new(address: Address, name: String) -> Self {
        Self {
            address,
            name,
            balances: WalletBalances::default(),
            last_burn_at: None,
            last_mine_at: None,
            burns_count: 0,
            mines_count: 0,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    pub fn record_failure(&mut self, error: impl ToString) {
        self.consecutive_failures += 1;
        self.last_error = Some(error.to_string());
    }
}

/// Process-wide counters for the shutdown summary.
#[derive(Debug)]
pub struct FarmStats {
    pub started_at: Instant,
    pub cycle_count: u64,
    pub total_burns: u64,
    pub total_mines: u64,
}

impl FarmStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            cycle_count: 0,
            total_burns: 0,
            total_mines: 0,
        }
    }
}

impl Default for FarmStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one full cycle across all wallets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    /// Wallets whose whole cycle (including the optional burn and the
    /// mine) succeeded.
    pub successes: usize,
    /// Wallets attempted this cycle (shutdown can cut a cycle short).
    pub processed: usize,
}
