use anyhow::Context;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use folio_core::constants::DEFAULT_BENCHMARK_TICKER;

/// Where ledgers are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One `user_portfolios` row per identity.
    Sqlite,
    /// One JSON file keyed by identity.
    File,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub storage: StorageBackend,
    pub db_path: String,
    pub data_file: PathBuf,
    pub benchmark: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Every username maps to the single-tenant key.
    pub single_tenant: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FOLIO_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid FOLIO_LISTEN_ADDR")?;
        let storage = match std::env::var("FOLIO_STORAGE")
            .unwrap_or_else(|_| "sqlite".into())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StorageBackend::Sqlite,
            "file" | "json" => StorageBackend::File,
            other => anyhow::bail!("Invalid FOLIO_STORAGE '{}', expected sqlite or file", other),
        };
        let db_path = std::env::var("FOLIO_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let data_file = std::env::var("FOLIO_DATA_FILE")
            .unwrap_or_else(|_| "./db/portfolio.json".into())
            .into();
        let benchmark =
            std::env::var("FOLIO_BENCHMARK").unwrap_or_else(|_| DEFAULT_BENCHMARK_TICKER.into());
        let cors_allow = std::env::var("FOLIO_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("FOLIO_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let single_tenant = std::env::var("FOLIO_SINGLE_TENANT")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            listen_addr,
            storage,
            db_path,
            data_file,
            benchmark,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            single_tenant,
        })
    }
}
