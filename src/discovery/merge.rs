use std::collections::HashSet;

use crate::tokens::{TokenCandidate, TokenKey};

/// Append `batch` to `existing`, keeping positive balances and first occurrence per key
pub fn merge_candidates(
    existing: Vec<TokenCandidate>,
    batch: Vec<TokenCandidate>,
) -> Vec<TokenCandidate> {
    let mut seen: HashSet<TokenKey> = existing.iter().map(TokenCandidate::key).collect();
    let mut merged = existing;

    for candidate in batch {
        if !candidate.balance.is_positive() {
            continue;
        }
        if seen.insert(candidate.key()) {
            merged.push(candidate);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::Network;
    use crate::tokens::{DiscoveryMethod, Token};
    use alloy::primitives::U256;

    #[test]
    fn test_dedupes_within_one_batch() {
        let native = |raw: u64| {
            TokenCandidate::new(Token::native(Network::Celo, DiscoveryMethod::Native), U256::from(raw))
        };
        let merged = merge_candidates(Vec::new(), vec![native(3), native(4), native(0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].balance.raw, U256::from(3u8));
    }

    #[test]
    fn test_same_address_on_other_network_is_distinct() {
        let merged = merge_candidates(
            vec![TokenCandidate::new(Token::native(Network::Celo, DiscoveryMethod::Native), U256::ONE)],
            vec![TokenCandidate::new(Token::native(Network::Ethereum, DiscoveryMethod::Native), U256::ONE)],
        );
        assert_eq!(merged.len(), 2);
    }
}
