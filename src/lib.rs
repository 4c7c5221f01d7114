//! Core library for the swap-cycler bot.
//!
//! The binary (`main.rs`) only wires configuration, logging and the ethers
//! client together; the candidate discovery, execution and batch loop live
//! here so they can be driven against any [`chain::ChainClient`].

pub mod chain;
pub mod config;
pub mod errors;
pub mod models;
pub mod scheduler;
pub mod swap;
pub mod tokens;
pub mod utils;
