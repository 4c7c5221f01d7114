//! Turns a chosen candidate into on-chain transactions.

use crate::chain::ChainClient;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{ContractCall, RouterSwap, SwapCandidate, SwapKind, Token};
use crate::tokens::TokenRegistry;
use crate::utils::{deadline_from_now, format_amount};
use ethers::types::{TxHash, U256};
use tracing::{info, warn};

/// Executes one swap at a time against the configured router.
pub struct SwapExecutor<'a, C> {
    client: &'a C,
    registry: &'a TokenRegistry,
    config: &'a AppConfig,
}

impl<'a, C: ChainClient> SwapExecutor<'a, C> {
    pub fn new(client: &'a C, registry: &'a TokenRegistry, config: &'a AppConfig) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    /// Run the approval (if any) and the swap for `candidate`, returning
    /// whether the swap was mined successfully. Errors are logged here and
    /// never propagated.
    pub async fn execute(&self, candidate: &SwapCandidate) -> bool {
        match self.try_execute(candidate).await {
            Ok(tx) => {
                info!(swap = %candidate, ?tx, "[SWAP] confirmed");
                true
            }
            Err(e) => {
                warn!(swap = %candidate, error = %e, "[SWAP] failed");
                false
            }
        }
    }

    async fn try_execute(&self, candidate: &SwapCandidate) -> Result<TxHash> {
        let from = self.registry.lookup(&candidate.from)?;
        let to = self.registry.lookup(&candidate.to)?;
        let kind = self.classify(from, to)?;
        info!(
            from = %from.symbol,
            to = %to.symbol,
            amount = %format_amount(candidate.amount, from.decimals),
            ?kind,
            "[SWAP] submitting"
        );

        if kind.needs_approval() {
            self.approve(from, candidate.amount).await?;
        }

        let swap = self.build_swap(kind, from, to, candidate.amount)?;
        let tx = self.client.submit(ContractCall::Swap(swap)).await?;
        info!(?tx, "[SWAP] swap sent, waiting for confirmation");
        self.client
            .wait_for_confirmation(tx, self.config.confirmation_timeout)
            .await?;
        Ok(tx)
    }

    fn classify(&self, from: &Token, to: &Token) -> Result<SwapKind> {
        let wrapped = &self.registry.wrapped_native().symbol;
        if &from.symbol == wrapped || &to.symbol == wrapped || from.symbol == to.symbol {
            return Err(AppError::Other(format!(
                "{} -> {} is not a tradable pair",
                from.symbol, to.symbol
            )));
        }
        match (from.is_native, to.is_native) {
            (true, false) => Ok(SwapKind::NativeForToken),
            (false, true) => Ok(SwapKind::TokenForNative),
            (false, false) => Ok(SwapKind::TokenForToken),
            (true, true) => Err(AppError::Other("native to native swap".into())),
        }
    }

    /// Grant the router `amount` on `token`, wait for the approval to be
    /// mined, then let the new allowance settle.
    async fn approve(&self, token: &Token, amount: U256) -> Result<()> {
        let tx = self
            .client
            .submit(ContractCall::Approve {
                token: token.address,
                spender: self.config.router_address,
                amount,
            })
            .await?;
        info!(token = %token.symbol, ?tx, "[SWAP] approval sent");
        self.client
            .wait_for_confirmation(tx, self.config.confirmation_timeout)
            .await?;
        tokio::time::sleep(self.config.approval_delay).await;
        Ok(())
    }

    /// Router arguments for a swap of `amount` from `from` to `to`. The native
    /// side of a path is always the wrapped-native contract.
    pub fn build_swap(
        &self,
        kind: SwapKind,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> Result<RouterSwap> {
        let weth = self.registry.wrapped_native().address;
        let (path, gas_limit) = match kind {
            SwapKind::NativeForToken => (vec![weth, to.address], self.config.eth_swap_gas_limit),
            SwapKind::TokenForNative => (vec![from.address, weth], self.config.eth_swap_gas_limit),
            SwapKind::TokenForToken => {
                (vec![from.address, to.address], self.config.token_swap_gas_limit)
            }
        };
        Ok(RouterSwap {
            kind,
            router: self.config.router_address,
            amount_in: amount,
            amount_out_min: U256::zero(),
            path,
            recipient: self.client.wallet_address(),
            deadline: deadline_from_now(self.config.deadline_window)?,
            gas_limit,
        })
    }
}
