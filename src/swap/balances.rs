//! Balance reads for the controlled wallet.

use crate::chain::{ChainClient, get_balance};
use crate::errors::Result;
use crate::models::BalanceSnapshot;
use crate::tokens::TokenRegistry;
use crate::utils::format_amount;
use ethers::types::U256;
use tracing::{info, warn};

/// Read the balance of every registered token except the wrapped-native one.
///
/// Reads are issued one after another; the first failure aborts the snapshot.
pub async fn fetch_balances<C: ChainClient>(
    client: &C,
    registry: &TokenRegistry,
) -> Result<BalanceSnapshot> {
    let wrapped = &registry.wrapped_native().symbol;
    let mut snapshot = BalanceSnapshot::new();
    for token in registry.all().iter().filter(|t| &t.symbol != wrapped) {
        let balance = get_balance(client, token).await?;
        info!(
            token = %token.symbol,
            balance = %format_amount(balance, token.decimals),
            "[BALANCE]"
        );
        snapshot.insert(token.symbol.clone(), balance);
    }
    Ok(snapshot)
}

/// Compare registry decimals with each contract's `decimals()`.
///
/// Mismatches and failed reads are logged and otherwise ignored.
pub async fn verify_decimals<C: ChainClient>(client: &C, registry: &TokenRegistry) -> usize {
    let mut mismatches = 0;
    for token in registry.all().iter().filter(|t| !t.is_native) {
        match client.token_decimals(token.address).await {
            Ok(onchain) if onchain != token.decimals => {
                mismatches += 1;
                warn!(
                    token = %token.symbol,
                    registry = token.decimals,
                    onchain,
                    "[INIT] decimals mismatch"
                );
            }
            Ok(_) => {}
            Err(e) => warn!(token = %token.symbol, error = %e, "[INIT] decimals read failed"),
        }
    }
    mismatches
}

/// Whether the native balance can fund an ETH-sourced swap of `swap_amount`.
/// Logs a warning when it can't; read errors are returned to the caller.
pub async fn check_native_funding<C: ChainClient>(client: &C, swap_amount: U256) -> Result<bool> {
    let native = client.native_balance().await?;
    let funded = native > swap_amount;
    if !funded {
        warn!(
            balance = %format_amount(native, 18),
            "[INIT] native balance below swap amount; only token-sourced swaps possible"
        );
    }
    Ok(funded)
}
