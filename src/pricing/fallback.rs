//! Static price table and symbol mapping
//!
//! The fallback table is the only source of prices when the live service is
//! down. Values are rough testnet-era USD quotes.

const FALLBACK_PRICES: &[(&str, f64)] = &[
    ("tron", 0.34),
    ("ethereum", 3500.0),
    ("celo", 0.5),
    ("tether", 1.0),
    ("usd-coin", 1.0),
    ("celo-dollar", 1.0),
    ("celo-euro", 1.1),
    ("dai", 1.0),
];

const SYMBOL_TO_COINGECKO_ID: &[(&str, &str)] = &[
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
    ("DAI", "dai"),
    ("WETH", "weth"),
    ("WBTC", "wrapped-bitcoin"),
    ("UNI", "uniswap"),
    ("LINK", "chainlink"),
    ("AAVE", "aave"),
    ("COMP", "compound-governance-token"),
    ("MKR", "maker"),
    ("SNX", "havven"),
    ("CRV", "curve-dao-token"),
    ("YFI", "yearn-finance"),
    ("SUSHI", "sushi"),
    ("GRT", "the-graph"),
    ("CUSD", "celo-dollar"),
    ("CEUR", "celo-euro"),
    ("CELO", "celo"),
    ("TRX", "tron"),
    ("ETH", "ethereum"),
];

pub fn fallback_price(coingecko_id: &str) -> Option<f64> {
    FALLBACK_PRICES
        .iter()
        .find(|(id, _)| *id == coingecko_id)
        .map(|(_, price)| *price)
}

/// Price ID for a token symbol, case-insensitive
pub fn coingecko_id_for_symbol(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.trim();
    SYMBOL_TO_COINGECKO_ID
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| *id)
}
