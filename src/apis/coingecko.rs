/// CoinGecko API client
///
/// API Documentation: https://docs.coingecko.com/reference/introduction
///
/// Endpoints implemented:
/// 1. /simple/price?ids=<ids>&vs_currencies=usd - USD spot price per coin id
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

use super::client::{HttpClient, RateLimiter};
use crate::config::PricesConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::pricing::PriceSource;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

pub struct CoinGeckoClient {
    http_client: HttpClient,
    rate_limiter: RateLimiter,
    base_url: String,
    api_key: Option<String>,
    enabled: bool,
}

impl CoinGeckoClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
        rate_limit_per_minute: usize,
        enabled: bool,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            rate_limiter: RateLimiter::new(rate_limit_per_minute),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            enabled,
        })
    }

    pub fn from_config(config: &PricesConfig) -> Result<Self, ApiError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout_secs,
            config.rate_limit_per_minute,
            config.enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fetch USD prices for `ids` in one request
    ///
    /// IDs the service does not know are simply absent from the result.
    pub async fn fetch_simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, ApiError> {
        if !self.enabled {
            return Err(ApiError::Disabled);
        }
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = url::Url::parse_with_params(
            &format!("{}/simple/price", self.base_url),
            &[("ids", ids.join(",")), ("vs_currencies", "usd".to_string())],
        )
        .map_err(|e| ApiError::InvalidResponse(format!("Invalid price URL: {}", e)))?;

        let _guard = self.rate_limiter.acquire().await?;
        let start = Instant::now();

        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![(API_KEY_HEADER, key)])
            .unwrap_or_default();

        let body: Value = self.http_client.get_json(url.as_str(), &headers).await?;
        let prices = parse_simple_price(&body)?;

        logger::debug(
            LogTag::Prices,
            &format!(
                "CoinGecko returned {}/{} prices in {}ms",
                prices.len(),
                ids.len(),
                start.elapsed().as_millis()
            ),
        );

        Ok(prices)
    }
}

/// `{"tether": {"usd": 1.0}, ...}` into id -> price
fn parse_simple_price(body: &Value) -> Result<HashMap<String, f64>, ApiError> {
    let entries = body
        .as_object()
        .ok_or_else(|| ApiError::InvalidResponse("simple/price body is not an object".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|(id, entry)| {
            entry
                .get("usd")
                .and_then(Value::as_f64)
                .map(|price| (id.clone(), price))
        })
        .collect())
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_usd_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, ApiError> {
        self.fetch_simple_prices(ids).await
    }
}
