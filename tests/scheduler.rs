mod common;

use common::{MockChain, ScriptedRandom, test_config};
use ethers::types::U256;
use ethers::utils::parse_ether;
use std::time::{Duration, Instant};
use swap_cycler::models::{BatchReport, ContractCall, CycleOutcome};
use swap_cycler::scheduler::{BatchScheduler, SystemRandom};
use swap_cycler::tokens::TokenRegistry;

#[tokio::test]
async fn empty_candidates_wait_and_never_execute() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let mut config = test_config(&[]);
    config.idle_delay = Duration::from_millis(30);
    let chain = MockChain::new();
    let mut scheduler = BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[]));

    let started = Instant::now();
    let outcome = scheduler.run_cycle(0, 1).await;

    assert_eq!(outcome, CycleOutcome::Idle);
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(chain.events().is_empty());
}

#[tokio::test]
async fn idle_polls_do_not_consume_cycle_budget() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[]);
    let chain = MockChain::new()
        .with_native(parse_ether("1").unwrap())
        .with_empty_reads(2);
    let mut scheduler = BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[1, 0]));

    let report = scheduler.run_batch().await;

    assert_eq!(
        report,
        BatchReport {
            cycles: 1,
            successes: 1,
            failures: 0,
            idle_polls: 2,
        }
    );
    assert_eq!(chain.submitted().len(), 1);
}

#[tokio::test]
async fn scripted_pick_selects_that_candidate() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[]);
    let chain = MockChain::new().with_native(parse_ether("1").unwrap());
    // Only native funds: candidates are native -> each tradable token in
    // registry order, so index 2 is DAI.
    let mut scheduler = BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[2]));

    let outcome = scheduler.run_cycle(0, 1).await;

    match outcome {
        CycleOutcome::Executed { candidate, success } => {
            assert!(success);
            assert_eq!(candidate.from, "ETH");
            assert_eq!(candidate.to, "DAI");
            assert_eq!(candidate.amount, config.swap_amount_eth);
        }
        CycleOutcome::Idle => panic!("expected a swap"),
    }
    match &chain.submitted()[..] {
        [ContractCall::Swap(swap)] => {
            assert_eq!(swap.path[1], registry.lookup("DAI").unwrap().address);
        }
        other => panic!("unexpected calls {other:?}"),
    }
}

#[tokio::test]
async fn failed_swaps_do_not_stop_the_batch() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[]);
    let usdt = registry.lookup("USDT").unwrap().address;
    let mut chain = MockChain::new().with_token(usdt, U256::from(100_000_000u64));
    chain.revert_swaps = true;
    let mut scheduler =
        BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[3, 0, 1, 2]));

    let report = scheduler.run_batch().await;

    assert_eq!(report.cycles, 3);
    assert_eq!(report.failures, 3);
    assert_eq!(report.successes, 0);
    // Every cycle approved then attempted its swap.
    assert_eq!(chain.submitted().len(), 6);
}

#[tokio::test]
async fn balance_read_failure_is_an_idle_cycle() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[]);
    let chain = MockChain::new()
        .with_native(parse_ether("1").unwrap())
        .with_failing_reads(1);
    let mut scheduler = BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[1, 0]));

    let report = scheduler.run_batch().await;

    assert_eq!(report.idle_polls, 1);
    assert_eq!(report.cycles, 1);
    assert_eq!(report.successes, 1);
}

#[tokio::test]
async fn totals_accumulate_across_batches() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[]);
    let chain = MockChain::new().with_native(parse_ether("1").unwrap());
    let mut scheduler =
        BatchScheduler::new(&chain, &registry, &config, ScriptedRandom::new(&[2, 0, 5, 1, 4]));

    scheduler.run_batch().await;
    scheduler.run_batch().await;

    assert_eq!(scheduler.totals().cycles, 3);
    assert_eq!(scheduler.totals().successes, 3);
    assert_eq!(chain.submitted().len(), 3);
}

#[test]
fn cycle_count_draws_cover_configured_range() {
    let registry = TokenRegistry::default_mainnet().unwrap();
    let config = test_config(&[("MIN_CYCLES", "10"), ("MAX_CYCLES", "20")]);
    let chain = MockChain::new();
    let mut scheduler = BatchScheduler::new(&chain, &registry, &config, SystemRandom::seeded(1));

    let draws: Vec<usize> = (0..10_000).map(|_| scheduler.draw_cycle_count()).collect();

    assert!(draws.iter().all(|n| (10..=20).contains(n)));
    assert!(draws.contains(&10));
    assert!(draws.contains(&20));
}
