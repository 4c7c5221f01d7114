//! Swap candidate discovery.

use super::balances::fetch_balances;
use crate::chain::ChainClient;
use crate::errors::Result;
use crate::models::{BalanceSnapshot, SwapCandidate};
use crate::tokens::TokenRegistry;
use ethers::types::U256;

/// Every legal swap given a balance snapshot.
///
/// * native balance strictly above `swap_amount`: native -> each tradable
///   token, carrying `swap_amount`;
/// * each tradable token with a positive balance: token -> native and
///   token -> every other tradable token, carrying the full balance.
///
/// The wrapped-native token never appears on either side. Tokens missing
/// from the snapshot count as zero.
pub fn derive_candidates(
    registry: &TokenRegistry,
    balances: &BalanceSnapshot,
    swap_amount: U256,
) -> Vec<SwapCandidate> {
    let native = &registry.native().symbol;
    let balance_of = |symbol: &str| balances.get(symbol).copied().unwrap_or_default();
    let mut candidates = Vec::new();

    if balance_of(native.as_str()) > swap_amount {
        candidates.extend(registry.tradable().map(|to| SwapCandidate {
            from: native.clone(),
            to: to.symbol.clone(),
            amount: swap_amount,
        }));
    }

    for from in registry.tradable() {
        let amount = balance_of(from.symbol.as_str());
        if amount.is_zero() {
            continue;
        }
        candidates.push(SwapCandidate {
            from: from.symbol.clone(),
            to: native.clone(),
            amount,
        });
        candidates.extend(
            registry
                .tradable()
                .filter(|to| to.symbol != from.symbol)
                .map(|to| SwapCandidate {
                    from: from.symbol.clone(),
                    to: to.symbol.clone(),
                    amount,
                }),
        );
    }

    candidates
}

/// Fetch fresh balances and derive the current candidate set.
///
/// An empty result means there is nothing to do this cycle.
pub async fn possible_swaps<C: ChainClient>(
    client: &C,
    registry: &TokenRegistry,
    swap_amount: U256,
) -> Result<Vec<SwapCandidate>> {
    let balances = fetch_balances(client, registry).await?;
    Ok(derive_candidates(registry, &balances, swap_amount))
}
