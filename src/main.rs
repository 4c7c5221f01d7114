use anyhow::{Context, Result};
use swap_cycler::{
    chain::{ChainClient, EthersChainClient},
    config::AppConfig,
    scheduler::{BatchScheduler, SystemRandom},
    swap::{check_native_funding, verify_decimals},
    tokens::TokenRegistry,
    utils,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    utils::init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "[FATAL] swap-cycler stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load()?;

    let registry = match &config.token_registry_path {
        Some(path) => TokenRegistry::from_json_file(path)
            .with_context(|| format!("loading token registry from {}", path.display()))?,
        None => TokenRegistry::default_mainnet()?,
    };

    let client = EthersChainClient::connect(&config.rpc_url, &config.private_key)
        .await
        .context("connecting to RPC endpoint")?;
    tracing::info!(
        wallet = ?client.wallet_address(),
        chain_id = client.chain_id(),
        router = ?config.router_address,
        tokens = registry.all().len(),
        swap_amount = %utils::format_amount(config.swap_amount_eth, 18),
        min_cycles = config.min_cycles,
        max_cycles = config.max_cycles,
        "[INIT] swap-cycler starting"
    );

    let mismatches = verify_decimals(&client, &registry).await;
    if mismatches > 0 {
        tracing::warn!(mismatches, "[INIT] registry decimals differ from chain");
    }

    if let Err(e) = check_native_funding(&client, config.swap_amount_eth).await {
        tracing::warn!(error = %e, "[INIT] native balance read failed");
    }

    let mut scheduler = BatchScheduler::new(&client, &registry, &config, SystemRandom::new());
    scheduler.run().await;
    Ok(())
}
