/// EVM JSON-RPC access through an alloy HTTP provider
///
/// Every request is bounded by the configured timeout. Endpoints that embed an
/// API key in the URL path register it with [`EvmRpcClient::with_secret`] so it
/// is scrubbed from every error this client returns.
use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, RootProvider};
use serde_json::Value;
use std::future::IntoFuture;
use std::time::Duration;
use url::Url;

use crate::errors::ApiError;
use crate::logger::{self, LogTag};

pub type EvmProvider = RootProvider<Ethereum>;

#[derive(Clone)]
pub struct EvmRpcClient {
    provider: EvmProvider,
    timeout: Duration,
    secret: Option<String>,
}

impl EvmRpcClient {
    pub fn new(rpc_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| ApiError::InvalidEndpoint(format!("invalid RPC URL: {}", e)))?;

        Ok(Self {
            provider: RootProvider::new_http(url),
            timeout: Duration::from_secs(timeout_secs),
            secret: None,
        })
    }

    /// Scrub `secret` from every error message
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn provider(&self) -> &EvmProvider {
        &self.provider
    }

    /// Await an alloy request under the timeout, mapping its error
    pub async fn bounded<F, T, E>(&self, request: F) -> Result<T, ApiError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Into<ApiError>,
    {
        let result = match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(ApiError::Timeout(self.timeout)),
        };

        result.map_err(|e| match &self.secret {
            Some(secret) => e.redact(secret),
            None => e,
        })
    }

    /// `eth_getBalance` at the latest block
    pub async fn native_balance(&self, owner: Address) -> Result<U256, ApiError> {
        self.bounded(self.provider.get_balance(owner)).await
    }

    /// Provider-specific method returning arbitrary JSON
    pub async fn raw_json<P>(&self, method: &'static str, params: P) -> Result<Value, ApiError>
    where
        P: serde::Serialize + Clone + Send + Sync + Unpin + std::fmt::Debug + 'static,
    {
        logger::debug(LogTag::Rpc, &format!("{} {:?}", method, params));
        self.bounded(self.provider.raw_request::<P, Value>(method.into(), params))
            .await
    }
}
