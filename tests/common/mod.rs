//! Local HTTP stubs for end-to-end tests

#![allow(dead_code)]

use alloy::primitives::{hex, U256};
use axum::Router;
use chainfolio::config::Config;
use chainfolio::logger::{self, LogLevel};

/// Serve `app` on an ephemeral port and return its base URL
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{}", addr)
}

/// Defaults with every network disabled, short timeouts, no price spacing
pub fn offline_config() -> Config {
    logger::update_logger_config(|cfg| cfg.min_level = LogLevel::Warning);

    let mut config = Config::default();
    config.networks.tron.enabled = false;
    config.networks.ethereum.enabled = false;
    config.networks.celo.enabled = false;
    config.networks.tron.timeout_secs = 2;
    config.networks.ethereum.timeout_secs = 2;
    config.networks.celo.timeout_secs = 2;
    config.prices.timeout_secs = 2;
    config.prices.rate_limit_per_minute = 0;
    config
}

/// 32-byte word holding `value`, as hex without prefix
pub fn word(value: U256) -> String {
    hex::encode(value.to_be_bytes::<32>())
}

/// ABI-encoded dynamic `string` return value
pub fn abi_string(value: &str) -> String {
    let data = hex::encode(value);
    let padded_len = ((data.len() + 63) / 64).max(1) * 64;
    format!(
        "0x{}{}{:0<width$}",
        word(U256::from(32u8)),
        word(U256::from(value.len())),
        data,
        width = padded_len
    )
}
