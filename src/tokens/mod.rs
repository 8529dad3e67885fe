//! Token identity, balances and unit conversion

pub mod types;
pub mod units;

pub use types::{
    Balance, DiscoveryMethod, Token, TokenCandidate, TokenKey, TokenMetadata, NATIVE_ADDRESS,
};
pub use units::{format_units, parse_decimal_integer, parse_hex_quantity, value_to_u256, value_to_u8};
