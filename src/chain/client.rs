use crate::chain::{ChainClient, SignerClient};
use crate::errors::{AppError, Result};
use crate::models::{ContractCall, RouterSwap, SwapKind};
use async_trait::async_trait;
use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TxHash, U64, U256},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

abigen!(
    Erc20Token,
    r"[
        function balanceOf(address account) view returns (uint256)
        function decimals() view returns (uint8)
        function approve(address spender, uint256 amount) returns (bool)
    ]",
);

abigen!(
    SwapRouter,
    r"[
        function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) payable returns (uint256[] amounts)
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) returns (uint256[] amounts)
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) returns (uint256[] amounts)
    ]",
);

/// [`ChainClient`] backed by an HTTP provider and a local signing key.
#[derive(Clone)]
pub struct EthersChainClient {
    client: Arc<SignerClient>,
}

impl EthersChainClient {
    /// Connect to `rpc_url` and bind `private_key`, using the chain id the node
    /// reports for transaction signing.
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let chain_id = provider.get_chainid().await?;
        let wallet = private_key
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id.as_u64());
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self { client })
    }

    pub fn chain_id(&self) -> u64 {
        self.client.signer().chain_id()
    }

    async fn submit_swap(&self, swap: RouterSwap) -> Result<TxHash> {
        let router = SwapRouter::new(swap.router, self.client.clone());
        let call = match swap.kind {
            SwapKind::NativeForToken => router
                .swap_exact_eth_for_tokens(
                    swap.amount_out_min,
                    swap.path,
                    swap.recipient,
                    swap.deadline,
                )
                .value(swap.amount_in),
            SwapKind::TokenForNative => router.swap_exact_tokens_for_eth(
                swap.amount_in,
                swap.amount_out_min,
                swap.path,
                swap.recipient,
                swap.deadline,
            ),
            SwapKind::TokenForToken => router.swap_exact_tokens_for_tokens(
                swap.amount_in,
                swap.amount_out_min,
                swap.path,
                swap.recipient,
                swap.deadline,
            ),
        }
        .gas(swap.gas_limit);
        let pending = call.send().await?;
        Ok(*pending)
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn wallet_address(&self) -> Address {
        self.client.address()
    }

    async fn native_balance(&self) -> Result<U256> {
        let balance = self
            .client
            .provider()
            .get_balance(self.wallet_address(), None)
            .await?;
        Ok(balance)
    }

    async fn token_balance(&self, token: Address) -> Result<U256> {
        let erc20 = Erc20Token::new(token, self.client.clone());
        let balance = erc20.balance_of(self.wallet_address()).call().await?;
        Ok(balance)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8> {
        let erc20 = Erc20Token::new(token, self.client.clone());
        let decimals = erc20.decimals().call().await?;
        Ok(decimals)
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHash> {
        let tx = match call {
            ContractCall::Approve {
                token,
                spender,
                amount,
            } => {
                let erc20 = Erc20Token::new(token, self.client.clone());
                let call = erc20.approve(spender, amount);
                let pending = call.send().await?;
                *pending
            }
            ContractCall::Swap(swap) => self.submit_swap(swap).await?,
        };
        debug!(?tx, "[CHAIN] transaction broadcast");
        Ok(tx)
    }

    async fn wait_for_confirmation(&self, tx: TxHash, timeout: Duration) -> Result<()> {
        let pending = PendingTransaction::new(tx, self.client.provider());
        let receipt = tokio::time::timeout(timeout, pending)
            .await
            .map_err(|_| AppError::ConfirmationTimeout { tx, timeout })??;
        match receipt {
            Some(r) if r.status == Some(U64::from(1)) => {
                debug!(?tx, block = ?r.block_number, "[CHAIN] transaction mined");
                Ok(())
            }
            Some(_) => Err(AppError::Reverted(tx)),
            None => Err(AppError::Dropped(tx)),
        }
    }
}
