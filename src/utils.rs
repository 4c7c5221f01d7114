//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use ethers::types::U256;
use ethers::utils::format_units;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Unix timestamp `window` from now, as a router deadline argument.
pub fn deadline_from_now(window: Duration) -> Result<U256> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let deadline = now
        .checked_add(window)
        .ok_or_else(|| AppError::Other(format!("deadline window {window:?} overflows")))?;
    Ok(U256::from(deadline.as_secs()))
}

/// Human-readable token amount, falling back to the raw integer when the
/// decimals can't be applied.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals as u32).unwrap_or_else(|_| amount.to_string())
}
