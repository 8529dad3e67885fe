/// Error types for the discovery and valuation pipeline
///
/// Only [`AddressError`] reaches callers of the pipeline. Transport and parse
/// failures are carried as [`ApiError`] inside the crate and degraded to zero
/// balances, `None` snapshots, or fallback prices at component boundaries.
use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use std::time::Duration;
use thiserror::Error;

use crate::networks::Network;

/// Caller-facing validation error, raised before the pipeline runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Empty address for {network}")]
    Empty { network: Network },

    #[error("Invalid {network} address '{address}': {reason}")]
    InvalidFormat {
        network: Network,
        address: String,
        reason: String,
    },

    #[error("Checksum mismatch for {network} address '{address}'")]
    BadChecksum { network: Network, address: String },

    #[error("Network {network} is disabled in configuration")]
    NetworkDisabled { network: Network },
}

impl AddressError {
    pub(crate) fn invalid(network: Network, address: &str, reason: impl Into<String>) -> Self {
        AddressError::InvalidFormat {
            network,
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

/// Internal failure of an outbound call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("API disabled")]
    Disabled,
}

impl ApiError {
    /// Map a reqwest failure, keeping timeouts distinguishable
    ///
    /// The request URL is dropped from the message since it may carry a key.
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        let error = error.without_url();
        if error.is_timeout() {
            ApiError::Timeout(timeout)
        } else if error.is_decode() {
            ApiError::InvalidResponse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }

    /// Replace every occurrence of `secret` in the message with `***`
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let scrub = |text: String| text.replace(secret, "***");
        match self {
            ApiError::Network(message) => ApiError::Network(scrub(message)),
            ApiError::InvalidResponse(message) => ApiError::InvalidResponse(scrub(message)),
            ApiError::InvalidEndpoint(message) => ApiError::InvalidEndpoint(scrub(message)),
            ApiError::HttpStatus { endpoint, status } => ApiError::HttpStatus {
                endpoint: scrub(endpoint),
                status,
            },
            ApiError::Rpc { code, message } => ApiError::Rpc {
                code,
                message: scrub(message),
            },
            other => other,
        }
    }

    /// Transport-level failures as opposed to well-formed negative answers
    pub fn is_network_unavailable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::HttpStatus { .. }
        )
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            RpcError::ErrorResp(payload) => ApiError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            RpcError::NullResp => ApiError::InvalidResponse("null JSON-RPC result".to_string()),
            RpcError::DeserError { err, .. } => ApiError::InvalidResponse(err.to_string()),
            RpcError::Transport(TransportErrorKind::HttpError(http)) => ApiError::HttpStatus {
                endpoint: "json-rpc".to_string(),
                status: http.status,
            },
            RpcError::Transport(kind) => ApiError::Network(kind.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

impl From<alloy::contract::Error> for ApiError {
    fn from(error: alloy::contract::Error) -> Self {
        match error {
            alloy::contract::Error::TransportError(transport) => transport.into(),
            other => ApiError::InvalidResponse(other.to_string()),
        }
    }
}

/// Configuration loading/validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

/// Cooldown limiter rejection or store failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CooldownError {
    #[error("Rate limit exceeded. Try again in {} hours.", hours_remaining(.remaining))]
    CoolingDown { remaining: chrono::Duration },

    #[error("Cooldown store error: {0}")]
    Store(String),
}

/// Whole hours left, rounded up
pub fn hours_remaining(remaining: &chrono::Duration) -> i64 {
    let secs = remaining.num_seconds().max(0);
    (secs + 3599) / 3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_message_rounds_hours_up() {
        let err = CooldownError::CoolingDown {
            remaining: chrono::Duration::minutes(61),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded. Try again in 2 hours.");
    }

    #[test]
    fn test_network_unavailable_classification() {
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_network_unavailable());
        assert!(ApiError::HttpStatus {
            endpoint: "x".into(),
            status: 500
        }
        .is_network_unavailable());
        assert!(!ApiError::InvalidResponse("bad".into()).is_network_unavailable());
    }

    #[test]
    fn test_redact_scrubs_secret() {
        let err = ApiError::Network(
            "error sending request for url (https://eth.example/v2/abc123)".to_string(),
        )
        .redact("abc123");
        assert!(!err.to_string().contains("abc123"));
        assert!(err.to_string().contains("/v2/***"));
        assert_eq!(ApiError::Disabled.redact("abc123"), ApiError::Disabled);
    }

    #[test]
    fn test_rpc_error_payload_maps_to_rpc() {
        let payload = alloy::rpc::json_rpc::ErrorPayload {
            code: -32601,
            message: "method not found".into(),
            data: None,
        };
        let err: ApiError = TransportError::ErrorResp(payload).into();
        assert_eq!(
            err,
            ApiError::Rpc {
                code: -32601,
                message: "method not found".to_string()
            }
        );
        assert!(!err.is_network_unavailable());
    }
}
