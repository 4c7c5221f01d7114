//! Blockchain access for the controlled wallet.
//!
//! Everything the swap loop needs from the chain goes through
//! [`ChainClient`], so the loop can run against the ethers-backed client in
//! production and an in-memory double in tests.

use crate::errors::Result;
use crate::models::{ContractCall, Token};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::LocalWallet,
    types::{Address, TxHash, U256},
};
use std::time::Duration;

pub mod client;

pub use client::EthersChainClient;

/// Signing middleware stack used for every contract binding.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the wallet whose balances are read and which signs calls.
    fn wallet_address(&self) -> Address;

    async fn native_balance(&self) -> Result<U256>;

    /// ERC-20 `balanceOf(wallet)` on `token`.
    async fn token_balance(&self, token: Address) -> Result<U256>;

    async fn token_decimals(&self, token: Address) -> Result<u8>;

    /// Sign and broadcast a state-changing call, returning its hash as soon
    /// as the node accepts it.
    async fn submit(&self, call: ContractCall) -> Result<TxHash>;

    /// Wait until `tx` is mined. Fails on revert, on a dropped transaction, or
    /// once `timeout` elapses.
    async fn wait_for_confirmation(&self, tx: TxHash, timeout: Duration) -> Result<()>;
}

/// Current balance of `token` for the client's wallet: the native balance for
/// the native token, a `balanceOf` read for everything else.
pub async fn get_balance<C: ChainClient + ?Sized>(client: &C, token: &Token) -> Result<U256> {
    if token.is_native {
        client.native_balance().await
    } else {
        client.token_balance(token.address).await
    }
}
