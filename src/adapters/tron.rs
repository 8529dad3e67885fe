/// Tron adapter: TronGrid full-node HTTP API
///
/// Endpoints used:
/// 1. POST /wallet/getaccount - native TRX balance in SUN
/// 2. POST /wallet/triggerconstantcontract - TRC-20 `balanceOf(address)`
use alloy::primitives::{hex, U256};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::erc20;
use super::NetworkAdapter;
use crate::apis::HttpClient;
use crate::config::TronNetworkConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::networks::{address::tron_account, Network};
use crate::tokens::value_to_u256;

const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

pub struct TronAdapter {
    http_client: HttpClient,
    node_url: String,
    api_key: Option<String>,
}

impl TronAdapter {
    pub fn new(
        node_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            node_url: node_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &TronNetworkConfig) -> Result<Self, ApiError> {
        Self::new(
            config.node_url.clone(),
            config.api_key.clone(),
            config.timeout_secs,
        )
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.node_url, path);
        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![(API_KEY_HEADER, key)])
            .unwrap_or_default();
        self.http_client.post_json(&url, body, &headers).await
    }
}

/// `constant_result[0]` of a triggerconstantcontract answer
fn constant_result(response: &Value) -> Option<U256> {
    let first = response.get("constant_result")?.get(0)?.as_str()?;
    let data = hex::decode(first.trim_start_matches("0x")).ok()?;
    erc20::decode_balance(&data)
}

#[async_trait]
impl NetworkAdapter for TronAdapter {
    fn network(&self) -> Network {
        Network::Tron
    }

    async fn native_balance(&self, address: &str) -> U256 {
        let body = json!({ "address": address, "visible": true });
        match self.post("/wallet/getaccount", &body).await {
            // Unactivated accounts come back as `{}`
            Ok(account) => account
                .get("balance")
                .and_then(value_to_u256)
                .unwrap_or(U256::ZERO),
            Err(e) => {
                logger::warning(
                    LogTag::Rpc,
                    &format!("tron getaccount for {} failed: {}", address, e),
                );
                U256::ZERO
            }
        }
    }

    async fn token_balance(&self, address: &str, contract: &str) -> U256 {
        let Some(owner) = tron_account(address) else {
            return U256::ZERO;
        };

        let body = json!({
            "owner_address": address,
            "contract_address": contract,
            "function_selector": "balanceOf(address)",
            "parameter": hex::encode(erc20::balance_of_arguments(owner)),
            "visible": true,
        });

        match self.post("/wallet/triggerconstantcontract", &body).await {
            Ok(response) => constant_result(&response).unwrap_or(U256::ZERO),
            Err(e) => {
                logger::debug(
                    LogTag::Rpc,
                    &format!("tron balanceOf on {} failed: {}", contract, e),
                );
                U256::ZERO
            }
        }
    }
}
