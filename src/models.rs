//! Shared data structures used throughout the application.

use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::fmt;

/// A token the wallet may hold and trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Unique registry key, e.g. "USDT".
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
    /// Chain base currency; never transacted through a token contract.
    pub is_native: bool,
}

/// Raw smallest-unit balances keyed by symbol, valid only for the moment
/// they were fetched.
pub type BalanceSnapshot = HashMap<String, U256>;

/// One legal swap the wallet could perform right now.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapCandidate {
    pub from: String,
    pub to: String,
    /// Amount in the source token's smallest units.
    pub amount: U256,
}

impl fmt::Display for SwapCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.amount)
    }
}

/// Router entry point a candidate maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    NativeForToken,
    TokenForNative,
    TokenForToken,
}

impl SwapKind {
    /// Whether the source token must grant the router an allowance first.
    pub fn needs_approval(self) -> bool {
        !matches!(self, SwapKind::NativeForToken)
    }
}

/// A state-changing call submitted through the chain client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// `approve(spender, amount)` on `token`.
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    /// Router call for one of the three swap variants.
    Swap(RouterSwap),
}

/// Arguments shared by the three router swap entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSwap {
    pub kind: SwapKind,
    pub router: Address,
    /// Exact input; sent as call value for `NativeForToken`.
    pub amount_in: U256,
    pub amount_out_min: U256,
    pub path: Vec<Address>,
    pub recipient: Address,
    /// Unix timestamp after which the router rejects the swap.
    pub deadline: U256,
    pub gas_limit: U256,
}

/// What a single scheduler cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No candidates (or balances could not be read); the cycle is retried.
    Idle,
    Executed {
        candidate: SwapCandidate,
        success: bool,
    },
}

/// Summary of one finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub cycles: usize,
    pub successes: usize,
    pub failures: usize,
    pub idle_polls: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Idle => self.idle_polls += 1,
            CycleOutcome::Executed { success, .. } => {
                self.cycles += 1;
                if *success {
                    self.successes += 1;
                } else {
                    self.failures += 1;
                }
            }
        }
    }

    /// Fold a finished batch into running totals.
    pub fn record_batch(&mut self, batch: &BatchReport) {
        self.cycles += batch.cycles;
        self.successes += batch.successes;
        self.failures += batch.failures;
        self.idle_polls += batch.idle_polls;
    }
}
