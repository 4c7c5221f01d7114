#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use swap_cycler::chain::ChainClient;
use swap_cycler::config::AppConfig;
use swap_cycler::errors::{AppError, Result};
use swap_cycler::models::ContractCall;
use swap_cycler::scheduler::RandomSource;

pub const WALLET: &str = "0x1111111111111111111111111111111111111111";

/// Everything the double saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submitted(TxHash, ContractCall),
    Confirmed(TxHash),
}

/// In-memory chain: fixed balances, recorded submissions, scripted failures.
pub struct MockChain {
    wallet: Address,
    native: Mutex<U256>,
    tokens: Mutex<HashMap<Address, U256>>,
    events: Mutex<Vec<Event>>,
    next_tx: AtomicU64,
    /// Upcoming native balance reads that report zero funds everywhere.
    empty_reads: AtomicUsize,
    /// Set while the current snapshot is one of the empty ones.
    snapshot_empty: AtomicBool,
    /// Upcoming native balance reads that fail outright.
    failing_reads: AtomicUsize,
    pub revert_swaps: bool,
    pub revert_approvals: bool,
    pub reject_submissions: bool,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            wallet: WALLET.parse().unwrap(),
            native: Mutex::new(U256::zero()),
            tokens: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            next_tx: AtomicU64::new(1),
            empty_reads: AtomicUsize::new(0),
            snapshot_empty: AtomicBool::new(false),
            failing_reads: AtomicUsize::new(0),
            revert_swaps: false,
            revert_approvals: false,
            reject_submissions: false,
        }
    }

    pub fn with_native(self, amount: U256) -> Self {
        *self.native.lock().unwrap() = amount;
        self
    }

    pub fn with_token(self, token: Address, amount: U256) -> Self {
        self.tokens.lock().unwrap().insert(token, amount);
        self
    }

    pub fn with_empty_reads(self, n: usize) -> Self {
        self.empty_reads.store(n, Ordering::SeqCst);
        self
    }

    pub fn with_failing_reads(self, n: usize) -> Self {
        self.failing_reads.store(n, Ordering::SeqCst);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Submitted(_, call) => Some(call),
                Event::Confirmed(_) => None,
            })
            .collect()
    }

    fn call_for(&self, tx: TxHash) -> Option<ContractCall> {
        self.events().into_iter().find_map(|e| match e {
            Event::Submitted(hash, call) if hash == tx => Some(call),
            _ => None,
        })
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl ChainClient for MockChain {
    fn wallet_address(&self) -> Address {
        self.wallet
    }

    async fn native_balance(&self) -> Result<U256> {
        if take_one(&self.failing_reads) {
            return Err(AppError::Other("rpc unavailable".into()));
        }
        // The native read opens every snapshot; token reads that follow
        // report zero while the snapshot is an empty one.
        let empty = take_one(&self.empty_reads);
        self.snapshot_empty.store(empty, Ordering::SeqCst);
        if empty {
            return Ok(U256::zero());
        }
        Ok(*self.native.lock().unwrap())
    }

    async fn token_balance(&self, token: Address) -> Result<U256> {
        if self.snapshot_empty.load(Ordering::SeqCst) {
            return Ok(U256::zero());
        }
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(&token)
            .copied()
            .unwrap_or_default())
    }

    async fn token_decimals(&self, _token: Address) -> Result<u8> {
        Ok(18)
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHash> {
        if self.reject_submissions {
            return Err(AppError::Other("nonce too low".into()));
        }
        let tx = TxHash::from_low_u64_be(self.next_tx.fetch_add(1, Ordering::SeqCst));
        self.events
            .lock()
            .unwrap()
            .push(Event::Submitted(tx, call));
        Ok(tx)
    }

    async fn wait_for_confirmation(&self, tx: TxHash, _timeout: Duration) -> Result<()> {
        let reverted = match self.call_for(tx) {
            Some(ContractCall::Approve { .. }) => self.revert_approvals,
            Some(ContractCall::Swap(_)) => self.revert_swaps,
            None => return Err(AppError::Dropped(tx)),
        };
        if reverted {
            return Err(AppError::Reverted(tx));
        }
        self.events.lock().unwrap().push(Event::Confirmed(tx));
        Ok(())
    }
}

/// Replays fixed draws, returning each value in turn.
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(draws: &[usize]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        let n = self.draws.pop_front().expect("scripted draw");
        assert!((low..=high).contains(&n), "scripted draw {n} outside {low}..={high}");
        n
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let n = self.draws.pop_front().expect("scripted draw");
        assert!(n < len, "scripted index {n} outside 0..{len}");
        n
    }
}

const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Config with zero waits and a 1..=3 cycle range unless overridden.
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("PRIVATE_KEY", TEST_KEY),
        ("RPC_URL", "http://localhost:8545"),
        ("MIN_CYCLES", "1"),
        ("MAX_CYCLES", "3"),
        ("CYCLE_DELAY_SECS", "0"),
        ("IDLE_DELAY_SECS", "0"),
        ("BATCH_PAUSE_SECS", "0"),
        ("APPROVAL_DELAY_SECS", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}
