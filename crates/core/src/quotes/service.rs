//! Price lookup service.
//!
//! Wraps a `folio_market_data` provider behind the narrow contract the domain
//! needs: one latest price, or a daily closing series from a start date.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use folio_market_data::{MarketDataError as ExternalMarketDataError, MarketDataProvider, Quote};

use super::errors::MarketDataError;
use super::model::PriceSeries;
use crate::errors::Result;

/// Price lookup contract consumed by the portfolio and performance services.
#[async_trait]
pub trait PriceLookupTrait: Send + Sync {
    /// Latest traded price of `symbol`, or `PriceUnavailable`.
    async fn latest_price(&self, symbol: &str) -> Result<Decimal>;

    /// Daily closing prices of `symbol` from `start` up to now.
    ///
    /// An empty range yields an empty series rather than an error.
    async fn price_history(&self, symbol: &str, start: NaiveDate) -> Result<PriceSeries>;
}

pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    async fn fetch_latest(&self, symbol: &str) -> std::result::Result<Quote, ExternalMarketDataError> {
        match self.provider.get_latest_quote(symbol).await {
            Ok(quote) => Ok(quote),
            Err(e) => match e.retry_class().delay() {
                Some(delay) => {
                    debug!(
                        "Latest quote for {} failed on {} ({}), retrying in {:?}",
                        symbol,
                        self.provider.id(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    self.provider.get_latest_quote(symbol).await
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> std::result::Result<Vec<Quote>, ExternalMarketDataError> {
        let start_dt = start.and_time(NaiveTime::MIN).and_utc();
        let end_dt = Utc::now();
        match self
            .provider
            .get_historical_quotes(symbol, start_dt, end_dt)
            .await
        {
            Ok(quotes) => Ok(quotes),
            Err(e) => match e.retry_class().delay() {
                Some(delay) => {
                    debug!(
                        "History for {} failed on {} ({}), retrying in {:?}",
                        symbol,
                        self.provider.id(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    self.provider
                        .get_historical_quotes(symbol, start_dt, end_dt)
                        .await
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl PriceLookupTrait for QuoteService {
    async fn latest_price(&self, symbol: &str) -> Result<Decimal> {
        let quote = self.fetch_latest(symbol).await.map_err(|e| {
            warn!("Latest price unavailable for {}: {}", symbol, e);
            MarketDataError::price_unavailable(symbol, &e)
        })?;
        Ok(quote.close)
    }

    async fn price_history(&self, symbol: &str, start: NaiveDate) -> Result<PriceSeries> {
        match self.fetch_history(symbol, start).await {
            Ok(quotes) => {
                let series = PriceSeries::from_quotes(&quotes);
                // Providers may return a bar dated before the requested start.
                Ok(series.iter().filter(|p| p.date >= start).collect())
            }
            Err(ExternalMarketDataError::NoDataForRange) => {
                debug!("No history for {} since {}", symbol, start);
                Ok(PriceSeries::new())
            }
            Err(e) => {
                warn!("Price history unavailable for {}: {}", symbol, e);
                Err(MarketDataError::price_unavailable(symbol, &e).into())
            }
        }
    }
}
