use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::ApiError;
use folio_core::{
    identity::Identity,
    ledger::{normalize_symbol, LedgerRepositoryTrait},
    portfolio::{
        holdings::{PortfolioService, PortfolioServiceTrait},
        performance::{PerformanceService, PerformanceServiceTrait},
    },
    quotes::{MarketDataError, QuoteService},
};
use folio_market_data::{MarketDataProvider, YahooProvider};
use folio_storage_sqlite::{JsonFileLedgerRepository, SqliteLedgerRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub benchmark: String,
    pub single_tenant: bool,
}

impl AppState {
    /// Storage identity for a username from the URL.
    pub fn identity(&self, username: &str) -> Result<Identity, ApiError> {
        if self.single_tenant {
            return Ok(Identity::single_tenant());
        }
        Ok(Identity::user(username)?)
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the application state with the Yahoo Finance provider.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(YahooProvider::new().map_err(MarketDataError::from)?);
    build_state_with_provider(config, provider).await
}

/// Builds the application state over any market data provider.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let repository: Arc<dyn LedgerRepositoryTrait> = match config.storage {
        StorageBackend::Sqlite => {
            let (pool, writer) = folio_storage_sqlite::open(&config.db_path)?;
            tracing::info!("Database path in use: {}", config.db_path);
            Arc::new(SqliteLedgerRepository::new(pool, writer))
        }
        StorageBackend::File => Arc::new(JsonFileLedgerRepository::new(&config.data_file)?),
    };
    tracing::info!(
        "Using {} market data, {:?} storage{}",
        provider.id(),
        config.storage,
        if config.single_tenant {
            " (single tenant)"
        } else {
            ""
        }
    );

    let price_lookup = Arc::new(QuoteService::new(provider));
    let portfolio_service = Arc::new(PortfolioService::new(repository, price_lookup.clone()));
    let performance_service = Arc::new(PerformanceService::with_benchmark(
        price_lookup,
        &config.benchmark,
    ));

    Ok(Arc::new(AppState {
        portfolio_service,
        performance_service,
        benchmark: normalize_symbol(&config.benchmark),
        single_tenant: config.single_tenant,
    }))
}
