/// TronScan-style account indexer
///
/// GET {base}/api/account?address=<addr>
/// -> { balance, trc20token_balances: [{ tokenId, tokenAbbr, tokenName, tokenDecimal, balance }] }
use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::Value;

use super::{AccountSnapshot, IndexedToken, IndexerClient};
use crate::apis::HttpClient;
use crate::config::TronNetworkConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::networks::Network;
use crate::tokens::{value_to_u256, value_to_u8};

const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

pub struct TronScanIndexer {
    http_client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl TronScanIndexer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &TronNetworkConfig) -> Result<Self, ApiError> {
        Self::new(
            config.indexer_url.clone(),
            config.api_key.clone(),
            config.timeout_secs,
        )
    }

    async fn fetch_account(&self, address: &str) -> Result<Value, ApiError> {
        let url = url::Url::parse_with_params(
            &format!("{}/api/account", self.base_url),
            &[("address", address)],
        )
        .map_err(|e| ApiError::InvalidResponse(format!("Invalid indexer URL: {}", e)))?;

        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![(API_KEY_HEADER, key)])
            .unwrap_or_default();

        self.http_client.get_json(url.as_str(), &headers).await
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_token(entry: &Value) -> Option<IndexedToken> {
    let contract = non_empty_string(entry.get("tokenId"))?;
    let raw = entry.get("balance").and_then(value_to_u256)?;

    Some(IndexedToken {
        contract,
        symbol: non_empty_string(entry.get("tokenAbbr")),
        name: non_empty_string(entry.get("tokenName")),
        decimals: entry.get("tokenDecimal").and_then(value_to_u8),
        raw,
    })
}

/// Account body into a snapshot; `None` when it is not a JSON object
pub(crate) fn parse_account(body: &Value) -> Option<AccountSnapshot> {
    let account = body.as_object()?;

    let native_raw = account
        .get("balance")
        .and_then(value_to_u256)
        .unwrap_or(U256::ZERO);
    let tokens = account
        .get("trc20token_balances")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_token).collect())
        .unwrap_or_default();

    Some(AccountSnapshot { native_raw, tokens })
}

#[async_trait]
impl IndexerClient for TronScanIndexer {
    fn network(&self) -> Network {
        Network::Tron
    }

    fn name(&self) -> &'static str {
        "tronscan"
    }

    async fn account_snapshot(&self, address: &str) -> Option<AccountSnapshot> {
        let body = match self.fetch_account(address).await {
            Ok(body) => body,
            Err(e) => {
                logger::warning(
                    LogTag::Indexer,
                    &format!("TronScan account lookup failed: {}", e),
                );
                return None;
            }
        };

        let snapshot = parse_account(&body);
        match &snapshot {
            Some(s) => logger::debug(
                LogTag::Indexer,
                &format!(
                    "TronScan: native {} SUN, {} TRC-20 entries for {}",
                    s.native_raw,
                    s.tokens.len(),
                    address
                ),
            ),
            None => logger::warning(LogTag::Indexer, "TronScan returned a non-object account body"),
        }
        snapshot
    }
}
