//! Joins discovered holdings with prices into a portfolio snapshot

mod display;
mod types;

pub use display::PortfolioDisplay;
pub use types::{ChainTotal, PortfolioEntry, PortfolioSnapshot};

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::networks::Network;
use crate::tokens::{Balance, TokenCandidate, TokenKey};

/// Value `candidates` with `prices` (keyed by CoinGecko ID)
///
/// Zero balances are dropped. Candidates sharing an identity key (the same
/// token held by several wallets) are summed into one entry. Every network in
/// `networks` gets a chain total, even when it holds nothing.
pub fn aggregate(
    networks: &[Network],
    candidates: Vec<TokenCandidate>,
    prices: &HashMap<String, f64>,
    generated_at: DateTime<Utc>,
) -> PortfolioSnapshot {
    let mut order: Vec<TokenKey> = Vec::new();
    let mut combined: HashMap<TokenKey, TokenCandidate> = HashMap::new();

    for candidate in candidates.into_iter().filter(|c| c.balance.is_positive()) {
        let key = candidate.key();
        match combined.get_mut(&key) {
            Some(existing) => {
                existing.balance.raw = existing.balance.raw.saturating_add(candidate.balance.raw);
            }
            None => {
                order.push(key.clone());
                combined.insert(key, candidate);
            }
        }
    }

    let mut entries: Vec<PortfolioEntry> = order
        .iter()
        .filter_map(|key| combined.remove(key))
        .map(|candidate| value_entry(candidate, prices))
        .collect();
    entries.sort_by(compare_entries);

    let mut chain_networks: Vec<Network> = networks.to_vec();
    for entry in &entries {
        if !chain_networks.contains(&entry.token.network) {
            chain_networks.push(entry.token.network);
        }
    }
    chain_networks.sort();
    chain_networks.dedup();

    let chain_totals: Vec<ChainTotal> = chain_networks
        .into_iter()
        .map(|network| {
            let held = entries.iter().filter(|e| e.token.network == network);
            ChainTotal {
                network,
                usd_value: held.clone().map(|e| e.value_usd).sum(),
                token_count: held.count(),
            }
        })
        .collect();

    let total_usd_value = chain_totals.iter().map(|t| t.usd_value).sum();

    PortfolioSnapshot {
        token_count: entries.len(),
        entries,
        chain_totals,
        total_usd_value,
        generated_at,
    }
}

fn value_entry(candidate: TokenCandidate, prices: &HashMap<String, f64>) -> PortfolioEntry {
    let TokenCandidate { token, balance } = candidate;
    let balance = Balance::new(balance.raw, token.decimals);
    let price_usd = token
        .coingecko_id
        .as_ref()
        .and_then(|id| prices.get(id))
        .copied()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(0.0);

    PortfolioEntry {
        formatted_balance: balance.formatted(),
        value_usd: balance.as_f64() * price_usd,
        token,
        balance,
        price_usd,
    }
}

fn compare_entries(a: &PortfolioEntry, b: &PortfolioEntry) -> Ordering {
    b.value_usd
        .total_cmp(&a.value_usd)
        .then_with(|| b.token.is_native.cmp(&a.token.is_native))
        .then_with(|| a.token.symbol.cmp(&b.token.symbol))
}
