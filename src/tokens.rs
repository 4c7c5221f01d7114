//! Static token registry: symbol -> address, decimals, native flag.

use crate::errors::{AppError, Result};
use crate::models::Token;
use ethers::types::Address;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Sentinel address conventionally used for the chain's native currency.
pub const NATIVE_SENTINEL: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

// (symbol, address, decimals, native, wrapped)
const MAINNET_TOKENS: &[(&str, &str, u8, bool, bool)] = &[
    ("ETH", NATIVE_SENTINEL, 18, true, false),
    ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18, false, true),
    ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6, false, false),
    ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6, false, false),
    ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18, false, false),
    ("WBTC", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", 8, false, false),
    ("LINK", "0x514910771AF9Ca656af840dff83E8264EcF986CA", 18, false, false),
    ("UNI", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", 18, false, false),
];

/// One registry row as written in a JSON registry file.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
    #[serde(default)]
    pub native: bool,
    #[serde(default)]
    pub wrapped: bool,
}

/// Immutable set of known tokens with exactly one native and one
/// wrapped-native entry.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    native: usize,
    wrapped: usize,
}

impl TokenRegistry {
    /// Built-in Ethereum mainnet registry.
    pub fn default_mainnet() -> Result<Self> {
        let entries = MAINNET_TOKENS
            .iter()
            .map(|(symbol, address, decimals, native, wrapped)| TokenEntry {
                symbol: symbol.to_string(),
                address: address.to_string(),
                decimals: *decimals,
                native: *native,
                wrapped: *wrapped,
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Load a registry from a JSON array of [`TokenEntry`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<TokenEntry> = serde_json::from_str(&raw)?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<TokenEntry>) -> Result<Self> {
        let mut tokens = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        let mut native = None;
        let mut wrapped = None;

        for (idx, entry) in entries.into_iter().enumerate() {
            if !seen.insert(entry.symbol.clone()) {
                return Err(AppError::Registry(format!(
                    "duplicate symbol {}",
                    entry.symbol
                )));
            }
            if entry.decimals > 18 {
                return Err(AppError::Registry(format!(
                    "{} has {} decimals, expected 0..=18",
                    entry.symbol, entry.decimals
                )));
            }
            if entry.native && entry.wrapped {
                return Err(AppError::Registry(format!(
                    "{} cannot be both native and wrapped",
                    entry.symbol
                )));
            }
            let address: Address = entry.address.parse().map_err(|_| {
                AppError::Registry(format!("{} has invalid address {}", entry.symbol, entry.address))
            })?;
            for (flag, slot, label) in [
                (entry.native, &mut native, "native"),
                (entry.wrapped, &mut wrapped, "wrapped-native"),
            ] {
                if flag && slot.replace(idx).is_some() {
                    return Err(AppError::Registry(format!("more than one {label} token")));
                }
            }
            tokens.push(Token {
                symbol: entry.symbol,
                address,
                decimals: entry.decimals,
                is_native: entry.native,
            });
        }

        let native = native.ok_or_else(|| AppError::Registry("no native token".into()))?;
        let wrapped = wrapped.ok_or_else(|| AppError::Registry("no wrapped-native token".into()))?;
        Ok(Self {
            tokens,
            native,
            wrapped,
        })
    }

    pub fn lookup(&self, symbol: &str) -> Result<&Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| AppError::UnknownToken(symbol.to_string()))
    }

    pub fn native(&self) -> &Token {
        &self.tokens[self.native]
    }

    pub fn wrapped_native(&self) -> &Token {
        &self.tokens[self.wrapped]
    }

    /// Every registered token in registry order.
    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens that may appear as a candidate's `from` or `to` besides the
    /// native one: neither native nor wrapped-native.
    pub fn tradable(&self) -> impl Iterator<Item = &Token> {
        let wrapped = self.wrapped;
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(idx, t)| !t.is_native && *idx != wrapped)
            .map(|(_, t)| t)
    }
}
