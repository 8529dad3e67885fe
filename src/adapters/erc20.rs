//! ERC-20 / TRC-20 read-only bindings

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function symbol() external view returns (string);
        function name() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// ABI-encoded `balanceOf(owner)` arguments, selector excluded
pub fn balance_of_arguments(owner: Address) -> Vec<u8> {
    IERC20::balanceOfCall { account: owner }.abi_encode()[4..].to_vec()
}

/// `balanceOf` return data
pub fn decode_balance(data: &[u8]) -> Option<U256> {
    IERC20::balanceOfCall::abi_decode_returns(data).ok()
}

fn clean_text(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let text = String::from_utf8_lossy(&bytes[..end]).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// `symbol()` / `name()` return data, accepting the legacy `bytes32` layout
pub fn decode_text(data: &[u8]) -> Option<String> {
    if let Ok(text) = IERC20::symbolCall::abi_decode_returns(data) {
        return clean_text(text.as_bytes());
    }
    // MKR-style tokens return a bare bytes32
    data.get(..32).and_then(clean_text)
}
