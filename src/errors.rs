use ethers::types::TxHash;
use std::time::Duration;
use thiserror::Error;

use crate::chain::SignerClient;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token registry error: {0}")]
    Registry(String),

    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] ethers::signers::WalletError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Contract error: {0}")]
    Contract(#[from] ethers::contract::ContractError<SignerClient>),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Transaction {0:?} reverted")]
    Reverted(TxHash),

    #[error("Transaction {0:?} dropped from mempool")]
    Dropped(TxHash),

    #[error("Transaction {tx:?} not confirmed within {timeout:?}")]
    ConfirmationTimeout { tx: TxHash, timeout: Duration },

    #[error("Other: {0}")]
    Other(String),
}
