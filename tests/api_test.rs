//! HTTP API tests, driven in-process through the router

use axum::{
    body::{to_bytes, Body},
    extract::Query,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;
use vaultcore::api::{create_router, handlers::AppState};
use vaultcore::{ExplorerClient, ExplorerConfig, TelemetryCollector};

const ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// Mock explorer: 2 ETH balance, twelve zero-value inbound transfers from distinct senders
async fn spawn_explorer() -> String {
    let router = Router::new().route(
        "/api",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            let address = q.get("address").cloned().unwrap_or_default();
            match q.get("action").map(String::as_str) {
                Some("balance") => {
                    Json(json!({"status": "1", "message": "OK", "result": "2000000000000000000"}))
                }
                _ => {
                    let txs: Vec<Value> = (0..12u64)
                        .map(|i| {
                            json!({
                                "hash": format!("0x{:02x}", i),
                                "from": format!("0x{:040x}", 0xbeef + i),
                                "to": address,
                                "value": "0",
                                "timeStamp": (1_700_000_000 + i * 600).to_string(),
                                "gasUsed": "21000",
                                "isError": "0",
                                "input": "0x"
                            })
                        })
                        .collect();
                    Json(json!({"status": "1", "message": "OK", "result": txs}))
                }
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// Endpoint nobody listens on
async fn dead_explorer() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

/// Explorer that answers only after `delay`
async fn slow_explorer(delay: Duration) -> String {
    let router = Router::new().route(
        "/api",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"status": "1", "message": "OK", "result": []}))
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn app_with_timeout(explorer_url: String, request_timeout: Duration) -> Router {
    let explorer = ExplorerClient::new(ExplorerConfig {
        api_url: explorer_url,
        api_key: None,
        timeout: Duration::from_secs(2),
        max_retries: 0,
    })
    .unwrap();
    let state = AppState::new(explorer, Arc::new(TelemetryCollector::new()));
    create_router(Arc::new(state), request_timeout)
}

fn app(explorer_url: String) -> Router {
    app_with_timeout(explorer_url, Duration::from_secs(60))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let app = app(dead_explorer().await);
    for uri in ["/health", "/v1/health"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }
}

#[tokio::test]
async fn test_classify() {
    let app = app(dead_explorer().await);
    let (status, body) = post_json(&app, "/v1/classify", json!({"query": "Doge Coin"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["entity_type"], "token");
    assert_eq!(body["data"]["query"], "Doge Coin");
}

#[tokio::test]
async fn test_vaultscore_classifies_query() {
    let app = app(dead_explorer().await);
    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({
            "query": ADDRESS,
            "suspicious_transaction_count": 15,
            "contract_verified": false,
            "liquidity_locked": true,
            "holder_count": 500,
            "rug_pull_risk": 0.2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["entity_type"], "address");
    assert_eq!(data["score"], 55);
    assert_eq!(data["label"], "fair");
    assert_eq!(data["label_name"], "Fair");
    assert_eq!(data["breakdown"].as_array().map(Vec::len), Some(2));
    assert!(data.get("signals").is_none());
}

#[tokio::test]
async fn test_vaultscore_rejects_bad_input() {
    let app = app(dead_explorer().await);

    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({"entity_type": "token", "rug_pull_risk": 1.5}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_SCAN_INPUT");

    let (status, _) = post_json(&app, "/v1/vaultscore", json!({"entity_type": "planet"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, "/v1/vaultscore", json!({"holder_count": 10})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_vaultscore_deep_scan_fetches_signals() {
    let app = app(spawn_explorer().await);
    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({
            "query": ADDRESS,
            "contract_verified": true,
            "liquidity_locked": true,
            "holder_count": 1000,
            "rug_pull_risk": 0.1,
            "deep_scan": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let data = &body["data"];
    assert_eq!(data["signals"]["transaction_count"], 12);
    assert_eq!(data["signals"]["suspicious_transaction_count"], 12);
    // -25 suspicious transactions, -15 suspicious patterns
    assert_eq!(data["score"], 60);
}

#[tokio::test]
async fn test_vaultscore_explorer_down_is_bad_gateway() {
    let app = app(dead_explorer().await);
    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({"query": ADDRESS, "deep_scan": true}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "EXPLORER_NETWORK");
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let app = app_with_timeout(
        slow_explorer(Duration::from_secs(5)).await,
        Duration::from_millis(200),
    );
    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({"query": ADDRESS, "deep_scan": true}),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_TIMEOUT");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = app(dead_explorer().await);

    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({"entity_type": "token", "holder_count": -1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");

    let (status, body) = post_json(
        &app,
        "/v1/vaultscore",
        json!({"entity_type": "project", "deep_scan": {"suspicious_pattern_count": 4}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");

    let (status, body) = post_json(&app, "/v1/vaultscore/batch", json!({"items": "nope"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");

    // no content type
    let request = Request::builder()
        .method("POST")
        .uri("/v1/classify")
        .body(Body::from(r#"{"query":"Doge Coin"}"#))
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app(dead_explorer().await);
    let (status, body) = get_json(&app, "/v2/vaultscore").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_NOT_FOUND");
}

#[tokio::test]
async fn test_batch() {
    let app = app(dead_explorer().await);
    let (status, body) = post_json(
        &app,
        "/v1/vaultscore/batch",
        json!({"items": [
            {"query": "Acme Inc", "contract_verified": true, "liquidity_locked": true, "holder_count": 500},
            {"entity_type": "token", "rug_pull_risk": -1.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_requested"], 2);
    assert_eq!(data["total_processed"], 1);
    assert_eq!(data["total_failed"], 1);
    assert_eq!(data["results"][0]["index"], 0);
    assert_eq!(data["results"][0]["status"], "success");
    assert_eq!(data["results"][0]["result"]["entity_type"], "company");
    assert_eq!(data["results"][1]["status"], "error");
    assert_eq!(data["results"][1]["error"]["code"], "INVALID_SCAN_INPUT");

    let (status, _) = post_json(&app, "/v1/vaultscore/batch", json!({"items": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_balance_lookup() {
    let app = app(spawn_explorer().await);

    let (status, body) = get_json(&app, &format!("/v1/address/{}/balance?chain_id=1", ADDRESS)).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["balance_wei"], "2000000000000000000");
    assert_eq!(body["data"]["balance"], 2.0);
    assert_eq!(body["data"]["native_symbol"], "ETH");

    let (status, body) = get_json(&app, "/v1/address/0x1234/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ADDRESS");

    let (status, body) = get_json(&app, &format!("/v1/address/{}/balance?chain_id=999", ADDRESS)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CFG_UNSUPPORTED_CHAIN");
}

#[tokio::test]
async fn test_transactions_lookup() {
    let app = app(spawn_explorer().await);
    let (status, body) =
        get_json(&app, &format!("/v1/address/{}/transactions?chain_id=8453", ADDRESS)).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["count"], 12);
    assert_eq!(body["data"]["chain_name"], "Base");
    assert_eq!(body["data"]["signals"]["deep_scan"]["suspicious_pattern_count"], 12);
    assert_eq!(body["data"]["transactions"][0]["timeStamp"], "1700000000");
}

#[tokio::test]
async fn test_stats_count_scans() {
    let app = app(dead_explorer().await);
    post_json(&app, "/v1/vaultscore", json!({"query": "Uniswap"})).await;

    let (status, body) = get_json(&app, "/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_scans"], 1);
    // unverified, unlocked, no holders: 100 - 20 - 15 - 10
    assert_eq!(body["data"]["scans_by_label"]["fair"], 1);
    assert_eq!(body["data"]["total_lookups"], 0);
}

#[tokio::test]
async fn test_scan_echo() {
    let app = app(dead_explorer().await);

    let (status, body) = post_json(
        &app,
        "/api/scan",
        json!({"address": ADDRESS, "results": {"score": 80}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"address": ADDRESS, "results": {"score": 80}}));

    for bad in [
        json!({"address": ADDRESS}),
        json!({"address": "", "results": [1]}),
        json!({"address": ADDRESS, "results": 0}),
        json!({"address": false, "results": "x"}),
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/scan")
            .header("content-type", "application/json")
            .body(Body::from(bad.to_string()))
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(bytes, b"Address and results are required".to_vec());
    }
}

#[tokio::test]
async fn test_scan_save_stores_nothing() {
    let app = app(dead_explorer().await);
    let (status, body) = post_json(&app, "/api/scan/save", json!({"anything": [1, 2, 3]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}
