//! Cycle behavior tests with an in-memory chain and a recording miner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, B256};

use wormfarm_chain::{ChainError, ChainReader, TxOutcome, Wallet, WalletBalances};
use wormfarm_orchestrator::{
    CycleReport, FarmConfig, MineOps, MinerError, Orchestrator, ShutdownController,
};
use wormfarm_types::amount::WEI_PER_ETHER;
use wormfarm_types::{BethAmount, BurnRequest, EthAmount, WormAmount};

const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Default)]
struct Ledger {
    eth_wei: u128,
    beth_wei: u128,
}

struct FakeChain {
    ledger: Arc<Mutex<Ledger>>,
    fail_reads: Arc<AtomicBool>,
}

impl ChainReader for FakeChain {
    async fn all_balances(&self, _address: Address) -> Result<WalletBalances, ChainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("balance read failed".into()));
        }
        let ledger = self.ledger.lock().unwrap();
        Ok(WalletBalances {
            eth: EthAmount::from_wei(ledger.eth_wei),
            beth: BethAmount::from_wei(ledger.beth_wei),
            worm: WormAmount::ZERO,
        })
    }

    async fn check_connection(&self) -> bool {
        true
    }

    async fn epoch_info(&self) -> (Option<u64>, Option<u64>) {
        (Some(42), Some(600))
    }
}

struct FakeMiner {
    ledger: Arc<Mutex<Ledger>>,
    burns: Arc<Mutex<Vec<BurnRequest>>>,
    mines: Arc<Mutex<Vec<(BethAmount, u64)>>>,
    fail_burn: Arc<AtomicBool>,
    fail_mine: Arc<AtomicBool>,
}

fn confirmed() -> TxOutcome {
    TxOutcome {
        tx_hash: B256::ZERO,
        block_number: 1,
    }
}

impl MineOps for FakeMiner {
    async fn burn(&self, _wallet: &Wallet, request: &BurnRequest) -> Result<TxOutcome, MinerError> {
        if self.fail_burn.load(Ordering::SeqCst) {
            return Err(MinerError::Runtime("prover unavailable".into()));
        }
        self.burns.lock().unwrap().push(*request);
        let mut ledger = self.ledger.lock().unwrap();
        ledger.eth_wei = ledger.eth_wei.saturating_sub(request.amount.wei());
        ledger.beth_wei += request.spend.wei();
        Ok(confirmed())
    }

    async fn mine(
        &self,
        _wallet: &Wallet,
        amount_per_epoch: BethAmount,
        num_epochs: u64,
    ) -> Result<TxOutcome, MinerError> {
        if self.fail_mine.load(Ordering::SeqCst) {
            return Err(MinerError::Runtime("participate reverted".into()));
        }
        self.mines.lock().unwrap().push((amount_per_epoch, num_epochs));
        let mut ledger = self.ledger.lock().unwrap();
        ledger.beth_wei = ledger.beth_wei.saturating_sub(amount_per_epoch.wei());
        Ok(confirmed())
    }

    async fn claim(
        &self,
        _wallet: &Wallet,
        _starting_epoch: u64,
        _num_epochs: u64,
    ) -> Result<TxOutcome, MinerError> {
        Ok(confirmed())
    }

    async fn check_prover(&self) -> bool {
        true
    }
}

struct Harness {
    orchestrator: Orchestrator<FakeChain, FakeMiner>,
    controller: ShutdownController,
    ledger: Arc<Mutex<Ledger>>,
    burns: Arc<Mutex<Vec<BurnRequest>>>,
    mines: Arc<Mutex<Vec<(BethAmount, u64)>>>,
    fail_reads: Arc<AtomicBool>,
    fail_burn: Arc<AtomicBool>,
    fail_mine: Arc<AtomicBool>,
}

fn config() -> FarmConfig {
    let mut config: FarmConfig =
        toml::from_str(r#"rpc_url = "http://127.0.0.1:8545""#).unwrap();
    config.wallet_keys = vec![TEST_KEY.to_string()];
    config.validate().unwrap();
    config
}

fn harness(eth_wei: u128, beth_wei: u128) -> Harness {
    let config = config();
    let wallets = config.wallets().unwrap();

    let ledger = Arc::new(Mutex::new(Ledger { eth_wei, beth_wei }));
    let burns = Arc::new(Mutex::new(Vec::new()));
    let mines = Arc::new(Mutex::new(Vec::new()));
    let fail_reads = Arc::new(AtomicBool::new(false));
    let fail_burn = Arc::new(AtomicBool::new(false));
    let fail_mine = Arc::new(AtomicBool::new(false));

    let chain = FakeChain {
        ledger: ledger.clone(),
        fail_reads: fail_reads.clone(),
    };
    let miner = FakeMiner {
        ledger: ledger.clone(),
        burns: burns.clone(),
        mines: mines.clone(),
        fail_burn: fail_burn.clone(),
        fail_mine: fail_mine.clone(),
    };

    let controller = ShutdownController::new();
    let orchestrator =
        Orchestrator::new(config, chain, miner, wallets, controller.subscribe());

    Harness {
        orchestrator,
        controller,
        ledger,
        burns,
        mines,
        fail_reads,
        fail_burn,
        fail_mine,
    }
}

#[tokio::test(start_paused = true)]
async fn empty_wallet_burns_then_mines_one_epoch() {
    let mut h = harness(WEI_PER_ETHER, 0);

    let report = h.orchestrator.run_cycle().await.unwrap();

    assert_eq!(
        report,
        CycleReport {
            successes: 1,
            processed: 1
        }
    );

    let burns = h.burns.lock().unwrap();
    assert_eq!(burns.len(), 1);
    assert_eq!(burns[0].amount.wei(), WEI_PER_ETHER / 20); // 0.05 ETH
    assert_eq!(burns[0].spend.wei(), 49_990_000_000_000_000); // 0.04999 BETH

    let mines = h.mines.lock().unwrap();
    assert_eq!(mines.len(), 1);
    assert_eq!(mines[0].0.wei(), WEI_PER_ETHER / 1000); // 0.001 BETH
    assert_eq!(mines[0].1, 1); // exactly one epoch

    assert_eq!(h.orchestrator.stats().total_burns, 1);
    assert_eq!(h.orchestrator.stats().total_mines, 1);
}

#[tokio::test(start_paused = true)]
async fn sufficient_beth_skips_burn_and_mines() {
    let mut h = harness(WEI_PER_ETHER, WEI_PER_ETHER / 1000);

    let report = h.orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.successes, 1);
    assert!(h.burns.lock().unwrap().is_empty());
    assert_eq!(h.mines.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn huge_beth_balance_still_mines_only_one_epoch() {
    let mut h = harness(WEI_PER_ETHER, WEI_PER_ETHER); // 1000 epochs' worth

    h.orchestrator.run_cycle().await.unwrap();

    let mines = h.mines.lock().unwrap();
    assert_eq!(mines.len(), 1);
    assert_eq!(mines[0].1, 1);
}

#[tokio::test(start_paused = true)]
async fn broke_wallet_neither_burns_nor_mines() {
    // No BETH and not enough ETH for budget + gas buffer.
    let mut h = harness(WEI_PER_ETHER / 20, 0);

    let report = h.orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.successes, 0);
    assert!(h.burns.lock().unwrap().is_empty());
    assert!(h.mines.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn burn_failure_aborts_wallet_cycle_without_mining() {
    let mut h = harness(WEI_PER_ETHER, 0);
    h.fail_burn.store(true, Ordering::SeqCst);

    let report = h.orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.successes, 0);
    assert!(h.mines.lock().unwrap().is_empty());
    assert_eq!(h.orchestrator.wallet_states()[0].consecutive_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn mine_failure_increments_then_success_resets() {
    let mut h = harness(WEI_PER_ETHER, WEI_PER_ETHER / 1000);

    h.fail_mine.store(true, Ordering::SeqCst);
    let report = h.orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.successes, 0);
    assert_eq!(h.orchestrator.wallet_states()[0].consecutive_failures, 1);

    // Top the ledger back up and let the next cycle succeed.
    h.fail_mine.store(false, Ordering::SeqCst);
    h.ledger.lock().unwrap().beth_wei = WEI_PER_ETHER / 1000;
    let report = h.orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.successes, 1);
    assert_eq!(h.orchestrator.wallet_states()[0].consecutive_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn persistent_failures_gate_the_wallet_out_of_the_cycle() {
    let mut h = harness(WEI_PER_ETHER, WEI_PER_ETHER / 1000);

    // Healthy first cycle.
    h.orchestrator.run_cycle().await.unwrap();
    assert_eq!(h.mines.lock().unwrap().len(), 1);

    // Reads and mines now fail; stale balances still look mineable.
    h.ledger.lock().unwrap().beth_wei = WEI_PER_ETHER / 1000;
    h.fail_reads.store(true, Ordering::SeqCst);
    h.fail_mine.store(true, Ordering::SeqCst);

    // read fail (1) + mine fail (2)
    let report = h.orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.successes, 0);
    assert_eq!(h.orchestrator.wallet_states()[0].consecutive_failures, 2);

    // read fail (3) reaches max_retries: the wallet is skipped before any
    // mine attempt, observable in the tally.
    let report = h.orchestrator.run_cycle().await.unwrap();
    assert_eq!(
        report,
        CycleReport {
            successes: 0,
            processed: 1
        }
    );
    // Only the healthy first cycle ever recorded a mine.
    assert_eq!(h.mines.lock().unwrap().len(), 1);
    assert!(h.orchestrator.wallet_states()[0].consecutive_failures >= 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_cycle_before_processing_wallets() {
    let mut h = harness(WEI_PER_ETHER, WEI_PER_ETHER / 1000);
    h.controller.shutdown();

    let report = h.orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.processed, 0);
    assert!(h.mines.lock().unwrap().is_empty());
}
