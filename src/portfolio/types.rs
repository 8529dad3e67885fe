/// Valuation output types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::networks::Network;
use crate::tokens::{Balance, Token, TokenKey};

/// One held token with its valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub token: Token,
    pub balance: Balance,
    /// Exact decimal rendering of `balance`
    pub formatted_balance: String,
    /// `0.0` when no price could be resolved
    pub price_usd: f64,
    pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTotal {
    pub network: Network,
    pub usd_value: f64,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Sorted by value, native first on ties, then symbol
    pub entries: Vec<PortfolioEntry>,
    pub chain_totals: Vec<ChainTotal>,
    pub total_usd_value: f64,
    pub token_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            entries: Vec::new(),
            chain_totals: Vec::new(),
            total_usd_value: 0.0,
            token_count: 0,
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn token_keys(&self) -> BTreeSet<TokenKey> {
        self.entries.iter().map(|e| e.token.key()).collect()
    }

    pub fn entries_for(&self, network: Network) -> impl Iterator<Item = &PortfolioEntry> {
        self.entries.iter().filter(move |e| e.token.network == network)
    }

    pub fn chain_total(&self, network: Network) -> Option<&ChainTotal> {
        self.chain_totals.iter().find(|t| t.network == network)
    }
}
