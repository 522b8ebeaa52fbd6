#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use folio_market_data::{MarketDataError, MarketDataProvider, Quote};
use folio_server::{api::app_router, build_state_with_provider, config::{Config, StorageBackend}};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tower::ServiceExt;

/// Provider with fixed latest prices and a short January 2025 history.
pub struct MockProvider {
    latest: HashMap<&'static str, Decimal>,
}

impl MockProvider {
    pub fn new() -> Self {
        let mut latest = HashMap::new();
        latest.insert("AAPL", dec!(130));
        latest.insert("MC.PA", dec!(550));
        latest.insert("CW8.PA", dec!(520));
        Self { latest }
    }
}

fn close(symbol: &str, day: u32, price: Decimal) -> Quote {
    Quote::new(
        symbol.to_string(),
        Utc.with_ymd_and_hms(2025, 1, day, 17, 30, 0).unwrap(),
        price,
        "MOCK".to_string(),
    )
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.latest
            .get(symbol)
            .map(|price| close(symbol, 31, *price))
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        match symbol {
            "CW8.PA" => Ok(vec![
                close(symbol, 2, dec!(500)),
                close(symbol, 3, dec!(505)),
                close(symbol, 6, dec!(510)),
            ]),
            "AAPL" => Ok(vec![
                close(symbol, 2, dec!(100)),
                close(symbol, 3, dec!(110)),
                close(symbol, 6, dec!(120)),
            ]),
            _ => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }
}

pub fn test_config(dir: &TempDir, storage: StorageBackend, single_tenant: bool) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        storage,
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        data_file: dir.path().join("portfolio.json"),
        benchmark: "CW8.PA".to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        single_tenant,
    }
}

pub async fn test_app(dir: &TempDir, storage: StorageBackend, single_tenant: bool) -> Router {
    let config = test_config(dir, storage, single_tenant);
    let state = build_state_with_provider(&config, Arc::new(MockProvider::new()))
        .await
        .unwrap();
    app_router(state, &config)
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}
