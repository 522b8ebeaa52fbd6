mod common;

use axum::http::{Method, StatusCode};
use folio_server::config::StorageBackend;
use serde_json::json;
use tempfile::tempdir;

fn trade(symbol: &str, price: f64, quantity: f64, date: &str) -> serde_json::Value {
    json!({ "symbol": symbol, "price": price, "quantity": quantity, "date": date })
}

#[tokio::test]
async fn buy_sell_undo_round_trip() {
    let tmp = tempdir().unwrap();
    let app = common::test_app(&tmp, StorageBackend::Sqlite, false).await;

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/Alice/buy",
        Some(trade("AAPL", 100.0, 10.0, "2025-01-02")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, position) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/alice/buy",
        Some(trade("aapl", 120.0, 10.0, "2025-01-03")),
    )
    .await;
    assert_eq!(position["quantity"].as_f64(), Some(20.0));
    assert_eq!(position["averageCost"].as_f64(), Some(110.0));
    assert_eq!(position["openDate"], "2025-01-02");

    let (status, sale) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/alice/sell",
        Some(trade("AAPL", 150.0, 5.0, "2025-01-06")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["realizedGain"].as_f64(), Some(200.0));

    let (_, sales) = common::send(&app, Method::GET, "/api/v1/users/alice/sales", None).await;
    assert_eq!(sales["sales"][0]["index"], 0);
    assert_eq!(sales["totalRealizedGain"].as_f64(), Some(200.0));

    let (status, _) =
        common::send(&app, Method::DELETE, "/api/v1/users/alice/sales/0", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, ledger) = common::send(&app, Method::GET, "/api/v1/users/ALICE/portfolio", None).await;
    assert_eq!(ledger["positions"]["AAPL"]["quantity"].as_f64(), Some(20.0));
    assert_eq!(ledger["positions"]["AAPL"]["averageCost"].as_f64(), Some(110.0));
    assert!(ledger["sales"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn error_kinds_map_to_statuses() {
    let tmp = tempdir().unwrap();
    let app = common::test_app(&tmp, StorageBackend::Sqlite, false).await;
    common::send(
        &app,
        Method::POST,
        "/api/v1/users/bob/buy",
        Some(trade("AAPL", 100.0, 1.0, "2025-01-02")),
    )
    .await;

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/bob/sell",
        Some(trade("TSLA", 100.0, 1.0, "2025-01-02")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/bob/sell",
        Some(trade("AAPL", 100.0, 2.0, "2025-01-02")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/bob/buy",
        Some(trade("AAPL", -1.0, 1.0, "2025-01-02")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/bob/buy",
        Some(trade("AAPL", 1e15, 1e15, "2025-01-02")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(&app, Method::DELETE, "/api/v1/users/bob/sales/3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(&app, Method::POST, "/api/v1/users/nobody/performance", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn positions_view_uses_live_prices() {
    let tmp = tempdir().unwrap();
    let app = common::test_app(&tmp, StorageBackend::File, false).await;
    for (symbol, price, quantity) in [("AAPL", 100.0, 10.0), ("NOPE", 5.0, 4.0)] {
        common::send(
            &app,
            Method::POST,
            "/api/v1/users/carol/buy",
            Some(trade(symbol, price, quantity, "2025-01-02")),
        )
        .await;
    }

    let (status, view) =
        common::send(&app, Method::GET, "/api/v1/users/carol/positions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["unavailable"], json!(["NOPE"]));
    assert_eq!(view["positions"][0]["livePrice"].as_f64(), Some(130.0));
    assert_eq!(view["totalUnrealizedGain"].as_f64(), Some(300.0));
    assert_eq!(view["totalInvested"].as_f64(), Some(1000.0));
    assert_eq!(view["totalUnrealizedPercent"].as_f64(), Some(30.0));
}

#[tokio::test]
async fn performance_against_benchmark() {
    let tmp = tempdir().unwrap();
    let app = common::test_app(&tmp, StorageBackend::Sqlite, false).await;
    common::send(
        &app,
        Method::POST,
        "/api/v1/users/dave/buy",
        Some(trade("AAPL", 90.0, 10.0, "2025-01-02")),
    )
    .await;

    let (status, result) = common::send(
        &app,
        Method::POST,
        "/api/v1/users/dave/performance",
        Some(json!({ "startDate": "2025-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["benchmark"], "CW8.PA");
    let totals: Vec<f64> = result["totalReturn"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    assert_eq!(totals, vec![0.0, 10.0, 20.0]);
    assert_eq!(result["summary"]["benchmarkReturn"].as_f64(), Some(2.0));
}

#[tokio::test]
async fn single_tenant_ignores_username() {
    let tmp = tempdir().unwrap();
    let app = common::test_app(&tmp, StorageBackend::File, true).await;
    common::send(
        &app,
        Method::POST,
        "/api/v1/users/erin/buy",
        Some(json!({ "name": "LVMH", "price": 600.0, "quantity": 1.0 })),
    )
    .await;

    let (_, ledger) = common::send(&app, Method::GET, "/api/v1/users/frank/portfolio", None).await;
    assert_eq!(ledger["positions"]["MC.PA"]["quantity"].as_f64(), Some(1.0));

    let (status, _) =
        common::send(&app, Method::DELETE, "/api/v1/users/frank/positions/mc.pa", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, ledger) = common::send(&app, Method::GET, "/api/v1/users/erin/portfolio", None).await;
    assert!(ledger["positions"].as_object().unwrap().is_empty());
}
