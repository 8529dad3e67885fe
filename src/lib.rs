//! Cross-chain wallet token discovery and portfolio valuation
//!
//! Given a wallet address on Tron, Ethereum or Celo, finds every token with a
//! positive balance (indexer first, allowlist probe as fallback), prices it in
//! USD, and aggregates a [`PortfolioSnapshot`]. Upstream failures degrade to
//! missing tokens or fallback prices; only a malformed address is an error.

pub mod adapters;
pub mod apis;
pub mod cache;
pub mod clock;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod indexers;
pub mod logger;
pub mod networks;
pub mod portfolio;
pub mod pricing;
pub mod ratelimit;
pub mod service;
pub mod tokens;

pub use errors::{AddressError, ApiError, ConfigError, CooldownError};
pub use networks::Network;
pub use portfolio::{ChainTotal, PortfolioEntry, PortfolioSnapshot};
pub use service::PortfolioService;
pub use tokens::{Balance, DiscoveryMethod, Token};
