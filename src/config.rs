//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Uniswap V2 Router02 on Ethereum mainnet.
pub const DEFAULT_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

/// Longest accepted swap deadline window: one year.
pub const MAX_DEADLINE_SECS: u64 = 365 * 24 * 60 * 60;

/// Consolidated application configuration, built once at startup and passed
/// by reference to every component.
#[derive(Clone)]
pub struct AppConfig {
    /// Hex private key of the controlled wallet.
    pub private_key: String,
    /// RPC endpoint for the Ethereum-compatible node.
    pub rpc_url: String,
    pub router_address: Address,
    /// Fixed native amount spent by every ETH-sourced swap, in wei.
    pub swap_amount_eth: U256,
    /// Inclusive bounds for the number of swap cycles per batch.
    pub min_cycles: usize,
    pub max_cycles: usize,
    pub cycle_delay: Duration,
    pub idle_delay: Duration,
    pub batch_pause: Duration,
    /// Pause between a confirmed approval and the swap that spends it.
    pub approval_delay: Duration,
    /// Added to the current time to form each swap's deadline.
    pub deadline_window: Duration,
    pub confirmation_timeout: Duration,
    pub eth_swap_gas_limit: U256,
    pub token_swap_gas_limit: U256,
    /// Optional JSON file replacing the built-in token registry.
    pub token_registry_path: Option<PathBuf>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("private_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .field("router_address", &self.router_address)
            .field("swap_amount_eth", &self.swap_amount_eth)
            .field("min_cycles", &self.min_cycles)
            .field("max_cycles", &self.max_cycles)
            .field("cycle_delay", &self.cycle_delay)
            .field("idle_delay", &self.idle_delay)
            .field("batch_pause", &self.batch_pause)
            .field("approval_delay", &self.approval_delay)
            .field("deadline_window", &self.deadline_window)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .field("eth_swap_gas_limit", &self.eth_swap_gas_limit)
            .field("token_swap_gas_limit", &self.token_swap_gas_limit)
            .field("token_registry_path", &self.token_registry_path)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `PRIVATE_KEY` and `RPC_URL` are required; everything else falls back to
    /// a default when absent but is rejected when present and malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let private_key = get("PRIVATE_KEY")
            .ok_or_else(|| AppError::Config("Set PRIVATE_KEY to the wallet's private key".into()))?;
        let rpc_url = get("RPC_URL").ok_or_else(|| {
            AppError::Config("Set RPC_URL to your Ethereum node HTTP endpoint".into())
        })?;
        url::Url::parse(&rpc_url)?;

        let router_address = parse_or(&get, "ROUTER_ADDRESS", DEFAULT_ROUTER)?;
        let swap_amount_raw = get("SWAP_AMOUNT_ETH").unwrap_or_else(|| "0.0001".into());
        let swap_amount_eth = parse_ether(&swap_amount_raw)
            .map_err(|e| AppError::Config(format!("SWAP_AMOUNT_ETH={swap_amount_raw}: {e}")))?;

        let min_cycles: usize = parse_or(&get, "MIN_CYCLES", "10")?;
        let max_cycles: usize = parse_or(&get, "MAX_CYCLES", "20")?;
        if min_cycles == 0 || min_cycles > max_cycles {
            return Err(AppError::Config(format!(
                "cycle range {min_cycles}..={max_cycles} must be non-empty and start at 1 or more"
            )));
        }

        let secs = |key: &str, default: &str| -> Result<Duration> {
            parse_or(&get, key, default).map(Duration::from_secs)
        };

        let deadline_window = secs("DEADLINE_SECS", "1200")?;
        if deadline_window.as_secs() > MAX_DEADLINE_SECS {
            return Err(AppError::Config(format!(
                "DEADLINE_SECS={} exceeds {MAX_DEADLINE_SECS}",
                deadline_window.as_secs()
            )));
        }

        Ok(Self {
            private_key,
            rpc_url,
            router_address,
            swap_amount_eth,
            min_cycles,
            max_cycles,
            cycle_delay: secs("CYCLE_DELAY_SECS", "10")?,
            idle_delay: secs("IDLE_DELAY_SECS", "30")?,
            batch_pause: secs("BATCH_PAUSE_SECS", "3600")?,
            approval_delay: secs("APPROVAL_DELAY_SECS", "5")?,
            deadline_window,
            confirmation_timeout: secs("CONFIRMATION_TIMEOUT_SECS", "300")?,
            eth_swap_gas_limit: U256::from(parse_or::<u64>(&get, "ETH_SWAP_GAS_LIMIT", "300000")?),
            token_swap_gas_limit: U256::from(parse_or::<u64>(
                &get,
                "TOKEN_SWAP_GAS_LIMIT",
                "500000",
            )?),
            token_registry_path: get("TOKEN_REGISTRY_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = get(key).unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|e| AppError::Config(format!("{key}={raw}: {e}")))
}
