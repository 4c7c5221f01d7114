//! Batch loop: randomized bursts of swap cycles separated by long pauses.

use crate::chain::ChainClient;
use crate::config::AppConfig;
use crate::models::{BatchReport, CycleOutcome};
use crate::swap::{SwapExecutor, possible_swaps};
use crate::tokens::TokenRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Source of the scheduler's random choices.
pub trait RandomSource {
    /// Uniform draw from `low..=high`.
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize;

    /// Uniform index into a non-empty collection of `len` items.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by an entropy-seeded `StdRng`.
pub struct SystemRandom(StdRng);

impl SystemRandom {
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.0.gen_range(low..=high)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

pub struct BatchScheduler<'a, C, R> {
    client: &'a C,
    registry: &'a TokenRegistry,
    config: &'a AppConfig,
    rng: R,
    totals: BatchReport,
    batches: u64,
}

impl<'a, C: ChainClient, R: RandomSource> BatchScheduler<'a, C, R> {
    pub fn new(client: &'a C, registry: &'a TokenRegistry, config: &'a AppConfig, rng: R) -> Self {
        Self {
            client,
            registry,
            config,
            rng,
            totals: BatchReport::default(),
            batches: 0,
        }
    }

    /// Counters accumulated over every finished batch.
    pub fn totals(&self) -> BatchReport {
        self.totals
    }

    pub fn draw_cycle_count(&mut self) -> usize {
        self.rng
            .range_inclusive(self.config.min_cycles, self.config.max_cycles)
    }

    /// One attempt at a swap cycle.
    ///
    /// Returns [`CycleOutcome::Idle`] after the idle wait when there is
    /// nothing to swap or balances could not be read; the caller retries the
    /// same cycle. Otherwise picks a candidate at random, executes it and
    /// waits the inter-cycle delay whatever the result.
    pub async fn run_cycle(&mut self, index: usize, total: usize) -> CycleOutcome {
        let mut candidates =
            match possible_swaps(self.client, self.registry, self.config.swap_amount_eth).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "[IDLE] balance read failed");
                    Vec::new()
                }
            };

        if candidates.is_empty() {
            info!(
                wait_secs = self.config.idle_delay.as_secs(),
                "[IDLE] no swap candidates, waiting"
            );
            tokio::time::sleep(self.config.idle_delay).await;
            return CycleOutcome::Idle;
        }

        let picked = self.rng.pick_index(candidates.len());
        let candidate = candidates.swap_remove(picked);
        info!(
            cycle = index + 1,
            total,
            options = candidates.len() + 1,
            swap = %candidate,
            "[SWAP] selected"
        );

        let executor = SwapExecutor::new(self.client, self.registry, self.config);
        let success = executor.execute(&candidate).await;
        info!(cycle = index + 1, total, success, "[SWAP] cycle finished");

        tokio::time::sleep(self.config.cycle_delay).await;
        CycleOutcome::Executed { candidate, success }
    }

    /// Run cycles until a freshly drawn cycle budget is spent. Idle polls do
    /// not consume the budget.
    pub async fn run_batch(&mut self) -> BatchReport {
        let total = self.draw_cycle_count();
        self.batches += 1;
        info!(batch = self.batches, cycles = total, "[BATCH] starting");

        let mut report = BatchReport::default();
        let mut index = 0;
        while index < total {
            let outcome = self.run_cycle(index, total).await;
            report.record(&outcome);
            if outcome != CycleOutcome::Idle {
                index += 1;
            }
        }

        self.totals.record_batch(&report);
        info!(
            batch = self.batches,
            cycles = report.cycles,
            successes = report.successes,
            failures = report.failures,
            idle_polls = report.idle_polls,
            total_successes = self.totals.successes,
            total_failures = self.totals.failures,
            "[BATCH] finished"
        );
        report
    }

    /// Batch, pause, repeat. Never returns.
    pub async fn run(&mut self) {
        loop {
            self.run_batch().await;
            info!(
                pause_secs = self.config.batch_pause.as_secs(),
                "[BATCH] pausing before next batch"
            );
            tokio::time::sleep(self.config.batch_pause).await;
        }
    }
}
