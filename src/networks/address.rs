//! Per-network address rules
//!
//! Two entry points with different strictness:
//! - [`validate_address`] for wallet addresses supplied by a caller. Rejects
//!   anything malformed, including EVM mixed-case input with a wrong EIP-55
//!   checksum.
//! - [`normalize_contract`] for contract addresses coming from allowlists,
//!   config, or indexers. Case is ignored and the canonical form returned.

use alloy::primitives::{hex, Address};

use super::{ChainFamily, Network};
use crate::errors::AddressError;
use crate::tokens::NATIVE_ADDRESS;

const TRON_ADDRESS_LEN: usize = 34;
const TRON_DECODED_LEN: usize = 25;
const TRON_VERSION_BYTE: u8 = 0x41;

/// Validate a wallet address and return its canonical form
pub fn validate_address(network: Network, address: &str) -> Result<String, AddressError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AddressError::Empty { network });
    }

    match network.family() {
        ChainFamily::Tron => validate_tron(network, address),
        ChainFamily::Evm => validate_evm(network, address),
    }
}

/// Canonical form of a contract address, `None` when it cannot be parsed
///
/// The native sentinel passes through unchanged.
pub fn normalize_contract(network: Network, address: &str) -> Option<String> {
    let address = address.trim();
    if address.eq_ignore_ascii_case(NATIVE_ADDRESS) {
        return Some(NATIVE_ADDRESS.to_string());
    }

    match network.family() {
        ChainFamily::Evm => evm_address(address).map(|parsed| parsed.to_checksum(None)),
        ChainFamily::Tron => {
            if address.len() == 42
                && address.get(..2).map_or(false, |p| p.eq_ignore_ascii_case("41"))
            {
                let bytes = hex::decode(address).ok()?;
                return Some(tron_base58_from_bytes(&bytes));
            }
            validate_tron(network, address).ok()
        }
    }
}

// =============================================================================
// EVM
// =============================================================================

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
}

fn validate_evm(network: Network, address: &str) -> Result<String, AddressError> {
    let body = strip_hex_prefix(address)
        .ok_or_else(|| AddressError::invalid(network, address, "missing 0x prefix"))?;

    if body.len() != 40 {
        return Err(AddressError::invalid(
            network,
            address,
            format!("expected 40 hex digits, got {}", body.len()),
        ));
    }
    let parsed = body
        .parse::<Address>()
        .map_err(|_| AddressError::invalid(network, address, "non-hex character"))?;

    // Single-case input carries no checksum
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && Address::parse_checksummed(format!("0x{}", body), None).is_err() {
        return Err(AddressError::BadChecksum {
            network,
            address: address.to_string(),
        });
    }

    Ok(parsed.to_checksum(None))
}

/// Parsed EVM address, any letter case
pub fn evm_address(address: &str) -> Option<Address> {
    let body = strip_hex_prefix(address.trim())?;
    if body.len() != 40 {
        return None;
    }
    body.parse::<Address>().ok()
}

// =============================================================================
// TRON
// =============================================================================

fn double_sha256(payload: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    second.into()
}

fn decode_tron(address: &str) -> Result<Vec<u8>, String> {
    if address.len() != TRON_ADDRESS_LEN {
        return Err(format!(
            "expected {} characters, got {}",
            TRON_ADDRESS_LEN,
            address.len()
        ));
    }
    if !address.starts_with('T') {
        return Err("must start with 'T'".to_string());
    }

    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| format!("base58 decode failed: {}", e))?;

    if bytes.len() != TRON_DECODED_LEN {
        return Err(format!("decoded to {} bytes", bytes.len()));
    }
    if bytes[0] != TRON_VERSION_BYTE {
        return Err(format!("unexpected version byte 0x{:02x}", bytes[0]));
    }
    Ok(bytes)
}

fn validate_tron(network: Network, address: &str) -> Result<String, AddressError> {
    let bytes = decode_tron(address).map_err(|reason| AddressError::invalid(network, address, reason))?;

    let checksum = double_sha256(&bytes[..21]);
    if checksum[..4] != bytes[21..] {
        return Err(AddressError::BadChecksum {
            network,
            address: address.to_string(),
        });
    }

    Ok(address.to_string())
}

/// Base58check form of a 21-byte `0x41`-prefixed Tron address
pub fn tron_base58_from_bytes(bytes: &[u8]) -> String {
    let checksum = double_sha256(bytes);
    let mut payload = Vec::with_capacity(bytes.len() + 4);
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload).into_string()
}

/// 20-byte account body of a base58check Tron address (version byte dropped)
pub fn tron_account(address: &str) -> Option<Address> {
    let bytes = decode_tron(address).ok()?;
    Some(Address::from_slice(&bytes[1..21]))
}
