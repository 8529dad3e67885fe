mod common;

use alloy::primitives::U256;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chainfolio::{DiscoveryMethod, Network, PortfolioService};
use common::{abi_string, offline_config, spawn_stub, word};

const TRON_WALLET: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
const NILE_USDT: &str = "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf";
const ETH_WALLET: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const SEPOLIA_USDC: &str = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";
const CUSTOM_TOKEN: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
const SEPOLIA_DAI: &str = "0x2227C4aE0fA56F51d4e6A46b13C2f8b9a2A5B3E3";

#[derive(Default)]
struct Counters {
    node_calls: AtomicUsize,
    balance_of_calls: AtomicUsize,
    /// Fund DAI with more than u128 can hold
    whale_dai: bool,
}

// =============================================================================
// TRON
// =============================================================================

async fn indexer_down() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn price_down() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn tronscan_account() -> Json<Value> {
    Json(json!({
        "balance": 2000000,
        "trc20token_balances": [{
            "tokenId": NILE_USDT,
            "tokenAbbr": "USDT",
            "tokenName": "Tether USD",
            "tokenDecimal": 6,
            "balance": "1500000"
        }]
    }))
}

async fn tron_getaccount(State(counters): State<Arc<Counters>>) -> Json<Value> {
    counters.node_calls.fetch_add(1, Ordering::SeqCst);
    // Unactivated account
    Json(json!({}))
}

async fn tron_trigger(
    State(counters): State<Arc<Counters>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    counters.node_calls.fetch_add(1, Ordering::SeqCst);
    let raw = if body["contract_address"] == NILE_USDT {
        U256::from(1_000_000u64)
    } else {
        U256::ZERO
    };
    Json(json!({ "result": { "result": true }, "constant_result": [word(raw)] }))
}

fn tron_node(counters: Arc<Counters>) -> Router {
    Router::new()
        .route("/wallet/getaccount", post(tron_getaccount))
        .route("/wallet/triggerconstantcontract", post(tron_trigger))
        .with_state(counters)
}

#[tokio::test]
async fn test_tron_indexer_failure_falls_back_to_probe() {
    let counters = Arc::new(Counters::default());
    let base = spawn_stub(
        tron_node(counters.clone())
            .route("/api/account", get(indexer_down))
            .route("/simple/price", get(price_down)),
    )
    .await;

    let mut config = offline_config();
    config.networks.tron.enabled = true;
    config.networks.tron.indexer_url = base.clone();
    config.networks.tron.node_url = base.clone();
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(TRON_WALLET, Network::Tron)
        .await
        .expect("valid address");

    assert_eq!(snapshot.entries.len(), 1);
    let entry = &snapshot.entries[0];
    assert_eq!(entry.token.address, NILE_USDT);
    assert_eq!(entry.token.discovery_method, DiscoveryMethod::ContractProbe);
    assert_eq!(entry.formatted_balance, "1.0");
    // Price service down, tether fallback applies
    assert!((snapshot.total_usd_value - 1.0).abs() < 1e-9);
    assert!(counters.node_calls.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn test_tron_indexer_success_skips_probe() {
    let counters = Arc::new(Counters::default());
    let base = spawn_stub(
        tron_node(counters.clone())
            .route("/api/account", get(tronscan_account))
            .route(
                "/simple/price",
                get(|| async { Json(json!({ "tron": { "usd": 0.5 }, "tether": { "usd": 1.0 } })) }),
            ),
    )
    .await;

    let mut config = offline_config();
    config.networks.tron.enabled = true;
    config.networks.tron.indexer_url = base.clone();
    config.networks.tron.node_url = base.clone();
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(TRON_WALLET, Network::Tron)
        .await
        .expect("valid address");

    assert_eq!(counters.node_calls.load(Ordering::SeqCst), 0);
    assert_eq!(snapshot.entries.len(), 2);
    assert!(snapshot
        .entries
        .iter()
        .all(|e| e.token.discovery_method == DiscoveryMethod::Indexer));
    assert_eq!(snapshot.entries[0].token.symbol, "USDT");
    assert_eq!(snapshot.entries[1].token.symbol, "TRX");
    assert!((snapshot.total_usd_value - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_everything_down_yields_empty_snapshot() {
    let mut config = offline_config();
    config.networks.tron.enabled = true;
    config.networks.tron.indexer_url = "http://127.0.0.1:1".to_string();
    config.networks.tron.node_url = "http://127.0.0.1:1".to_string();
    config.prices.base_url = "http://127.0.0.1:1".to_string();

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(TRON_WALLET, Network::Tron)
        .await
        .expect("valid address");

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.total_usd_value, 0.0);
}

// =============================================================================
// EVM
// =============================================================================

fn rpc_result(request: &Value, result: Value) -> Json<Value> {
    Json(json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }))
}

async fn evm_rpc(State(counters): State<Arc<Counters>>, Json(request): Json<Value>) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default();
    match method {
        "eth_getBalance" => rpc_result(&request, json!("0x0")),
        "alchemy_getTokenBalances" => rpc_result(
            &request,
            json!({
                "address": ETH_WALLET,
                "tokenBalances": [
                    { "contractAddress": CUSTOM_TOKEN.to_lowercase(), "tokenBalance": "0x0a", "error": null },
                    { "contractAddress": SEPOLIA_USDC.to_lowercase(), "tokenBalance": "0x0", "error": null },
                    // No contract address: skipped on its own
                    { "tokenBalance": "0x01", "error": null }
                ]
            }),
        ),
        "eth_call" => {
            let to = request["params"][0]["to"].as_str().unwrap_or_default().to_lowercase();
            let call = &request["params"][0];
            let data = call["input"]
                .as_str()
                .or_else(|| call["data"].as_str())
                .unwrap_or_default();

            if data.starts_with("0x70a08231") {
                counters.balance_of_calls.fetch_add(1, Ordering::SeqCst);
                let raw = if to == SEPOLIA_USDC.to_lowercase() {
                    U256::from(1_000_000u64)
                } else if counters.whale_dai && to == SEPOLIA_DAI.to_lowercase() {
                    U256::from(1u8) << 136usize
                } else {
                    U256::ZERO
                };
                return rpc_result(&request, json!(format!("0x{}", word(raw))));
            }
            if to != CUSTOM_TOKEN.to_lowercase() {
                return rpc_result(&request, json!("0x"));
            }
            let result = match data {
                "0x95d89b41" => abi_string("TST"),
                "0x06fdde03" => abi_string("Test Token"),
                "0x313ce567" => format!("0x{}", word(U256::from(8u8))),
                _ => "0x".to_string(),
            };
            rpc_result(&request, json!(result))
        }
        _ => Json(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32601, "message": "method not found" }
        })),
    }
}

fn evm_node(counters: Arc<Counters>) -> Router {
    Router::new()
        .route("/rpc", post(evm_rpc))
        .route("/v2/test-key", post(evm_rpc))
        .route("/simple/price", get(price_down))
        .with_state(counters)
}

#[tokio::test]
async fn test_evm_probe_finds_single_allowlisted_token() {
    let counters = Arc::new(Counters::default());
    let base = spawn_stub(evm_node(counters.clone())).await;

    let mut config = offline_config();
    config.networks.ethereum.enabled = true;
    config.networks.ethereum.rpc_url = format!("{}/rpc", base);
    config.networks.ethereum.indexer_api_key = None;
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(ETH_WALLET, Network::Ethereum)
        .await
        .expect("valid address");

    assert_eq!(snapshot.entries.len(), 1);
    let entry = &snapshot.entries[0];
    assert_eq!(entry.token.address, SEPOLIA_USDC);
    assert_eq!(entry.formatted_balance, "1.0");
    assert!(snapshot.entries.iter().all(|e| !e.token.is_native));
    assert!(counters.balance_of_calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_evm_allowlist_scan_keeps_balances_wider_than_u128() {
    let counters = Arc::new(Counters {
        whale_dai: true,
        ..Counters::default()
    });
    let base = spawn_stub(evm_node(counters)).await;

    let mut config = offline_config();
    config.networks.ethereum.enabled = true;
    config.networks.ethereum.rpc_url = format!("{}/rpc", base);
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(ETH_WALLET, Network::Ethereum)
        .await
        .expect("valid address");

    let dai = snapshot
        .entries
        .iter()
        .find(|e| e.token.symbol == "DAI")
        .expect("DAI discovered");
    assert_eq!(dai.balance.raw, U256::from(1u8) << 136usize);
    assert_eq!(dai.formatted_balance, "87112285931760246646623.899502532662132736");
    // Largest holding sorts first
    assert_eq!(snapshot.entries[0].token.symbol, "DAI");
}

#[tokio::test]
async fn test_evm_indexer_reads_metadata_and_skips_probe() {
    let counters = Arc::new(Counters::default());
    let base = spawn_stub(evm_node(counters.clone())).await;

    let mut config = offline_config();
    config.networks.ethereum.enabled = true;
    config.networks.ethereum.rpc_url = format!("{}/rpc", base);
    config.networks.ethereum.indexer_url = Some(format!("{}/v2", base));
    config.networks.ethereum.indexer_api_key = Some("test-key".to_string());
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let snapshot = service
        .discover_and_price(ETH_WALLET, Network::Ethereum)
        .await
        .expect("valid address");

    assert_eq!(counters.balance_of_calls.load(Ordering::SeqCst), 0);
    assert_eq!(snapshot.entries.len(), 1);
    let entry = &snapshot.entries[0];
    assert_eq!(entry.token.address, CUSTOM_TOKEN);
    assert_eq!(entry.token.symbol, "TST");
    assert_eq!(entry.token.name, "Test Token");
    assert_eq!(entry.token.decimals, 8);
    assert_eq!(entry.token.discovery_method, DiscoveryMethod::Indexer);
    assert_eq!(entry.formatted_balance, "0.0000001");
    // No price ID for TST: listed at zero
    assert_eq!(entry.price_usd, 0.0);
}

#[tokio::test]
async fn test_repeated_calls_are_idempotent() {
    let counters = Arc::new(Counters::default());
    let base = spawn_stub(evm_node(counters)).await;

    let mut config = offline_config();
    config.networks.ethereum.enabled = true;
    config.networks.ethereum.rpc_url = format!("{}/rpc", base);
    config.prices.base_url = base;

    let service = PortfolioService::from_config(&config).expect("service builds");
    let first = service
        .discover_and_price(ETH_WALLET, Network::Ethereum)
        .await
        .expect("valid address");
    let second = service
        .discover_and_price(&ETH_WALLET.to_lowercase(), Network::Ethereum)
        .await
        .expect("valid address");

    assert_eq!(first.token_keys().len(), 1);
    assert_eq!(first.token_keys(), second.token_keys());
}
