use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use folio_core::QuoteStore;
use folio_market_data::Quote;
use folio_server::{api::app_router, build_state, config::Config, AppState};
use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

// Nothing listens on the discard port, so every provider call fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

async fn build_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let tmp = tempdir().unwrap();
    let mut vars = HashMap::new();
    vars.insert(
        "FOLIO_DB_PATH".to_string(),
        tmp.path().join("test.db").to_string_lossy().to_string(),
    );
    vars.insert("FOLIO_YAHOO_BASE_URL".to_string(), UNREACHABLE.to_string());
    vars.insert("FOLIO_PROVIDER_TIMEOUT_SECS".to_string(), "2".to_string());

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let state = build_state(&config).await.unwrap();
    (app_router(state.clone(), &config), state, tmp)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed(state: &AppState, quote: Quote) {
    state.quote_store.save(&quote).await.unwrap();
}

#[tokio::test]
async fn health_reports_cooldown_state() {
    let (app, state, _tmp) = build_test_app().await;

    let (status, json) = send(&app, get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["coolingDown"], false);

    state.cooldown.trigger();
    let (_, json) = send(&app, get("/api/v1/health")).await;
    assert_eq!(json["coolingDown"], true);
}

#[tokio::test]
async fn quotes_require_at_least_one_ticker() {
    let (app, _state, _tmp) = build_test_app().await;

    let (status, json) = send(&app, get("/api/v1/quotes")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);

    let (status, _) = send(&app, get("/api/v1/quotes?tickers=%20,%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quotes_fall_back_to_store_then_missing() {
    let (app, state, _tmp) = build_test_app().await;
    seed(
        &state,
        Quote::new(
            "BHP.AX",
            Some(dec!(45.10)),
            Some(dec!(44.80)),
            None,
            Utc::now(),
            "YAHOO_PUBLIC",
        ),
    )
    .await;

    let (status, json) = send(&app, get("/api/v1/quotes?tickers=bhp,ZZZ.AX")).await;
    assert_eq!(status, StatusCode::OK);

    let quotes = json.as_array().unwrap();
    assert_eq!(quotes.len(), 2);

    assert_eq!(quotes[0]["ticker"], "BHP.AX");
    assert_eq!(quotes[0]["origin"], "store");
    assert_eq!(quotes[0]["price"].as_f64(), Some(45.10));
    assert!(quotes[0]["change"].is_null());

    assert_eq!(quotes[1]["ticker"], "ZZZ.AX");
    assert_eq!(quotes[1]["origin"], "missing");
    assert!(quotes[1]["price"].is_null());
    assert!(quotes[1]["previousClose"].is_null());
}

#[tokio::test]
async fn valuation_uses_resolved_quotes() {
    let (app, state, _tmp) = build_test_app().await;
    seed(
        &state,
        Quote::new(
            "BHP.AX",
            Some(dec!(5.50)),
            None,
            Some(dec!(0.20)),
            Utc::now(),
            "YAHOO_PUBLIC",
        ),
    )
    .await;

    let body = serde_json::json!({
        "cashBalance": 1000,
        "holdings": [
            { "ticker": "bhp", "quantity": 10, "purchasePrice": 5.0 },
            { "ticker": "NEW", "quantity": 4, "purchasePrice": 1.0 }
        ]
    });
    let (status, json) = send(&app, post_json("/api/v1/valuation", body)).await;
    assert_eq!(status, StatusCode::OK);

    // 1000 + 55 + 4
    assert_eq!(json["currentValue"].as_f64(), Some(1059.0));
    assert_eq!(json["totalProfit"].as_f64(), Some(5.0));
    assert_eq!(json["dailyProfit"].as_f64(), Some(2.0));
    assert_eq!(json["dailyProfitUnknown"], 1);

    let holdings = json["holdings"].as_array().unwrap();
    assert_eq!(holdings[0]["ticker"], "BHP.AX");
    assert_eq!(holdings[0]["priceBasis"], "live");
    assert_eq!(holdings[0]["origin"], "store");
    assert_eq!(holdings[0]["stale"], true);
    assert_eq!(holdings[1]["priceBasis"], "purchasePrice");
    assert!(holdings[1]["dailyProfit"].is_null());
}

#[tokio::test]
async fn valuation_rejects_non_positive_quantity() {
    let (app, _state, _tmp) = build_test_app().await;

    let body = serde_json::json!({
        "cashBalance": 0,
        "holdings": [{ "ticker": "BHP.AX", "quantity": 0, "purchasePrice": 5.0 }]
    });
    let (status, json) = send(&app, post_json("/api/v1/valuation", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn valuation_rejects_amounts_out_of_range() {
    let (app, state, _tmp) = build_test_app().await;
    seed(
        &state,
        Quote::new("BHP.AX", Some(dec!(1e14)), None, None, Utc::now(), "YAHOO_PUBLIC"),
    )
    .await;

    let body = serde_json::json!({
        "cashBalance": 0,
        "holdings": [{ "ticker": "BHP.AX", "quantity": 1e15, "purchasePrice": 1 }]
    });
    let (status, json) = send(&app, post_json("/api/v1/valuation", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("out of range"));
}
