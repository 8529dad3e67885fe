//! Outbound HTTP clients
//!
//! REST clients wrap [`client::HttpClient`]; EVM JSON-RPC goes through an alloy
//! provider in [`evm_rpc`]. Both bound each request by the configured timeout
//! and map failures to [`ApiError`](crate::errors::ApiError).

pub mod client;
pub mod coingecko;
pub mod evm_rpc;

pub use client::{HttpClient, RateLimiter};
pub use coingecko::CoinGeckoClient;
pub use evm_rpc::{EvmProvider, EvmRpcClient};
