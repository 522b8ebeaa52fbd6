use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::performance_calculator::calculate_benchmark_comparison;
use super::performance_model::{BenchmarkComparison, PerformanceRequest};
use crate::constants::DEFAULT_BENCHMARK_TICKER;
use crate::errors::{Error, PerformanceError, Result, ValidationError};
use crate::ledger::{normalize_symbol, Ledger};
use crate::quotes::{PriceLookupTrait, PriceSeries};
use crate::utils::time_utils::{start_of_year, today};

#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Builds a request, defaulting to the configured benchmark and the
    /// year-to-date window.
    fn request(
        &self,
        benchmark: Option<&str>,
        analysis_start: Option<NaiveDate>,
    ) -> Result<PerformanceRequest>;

    /// Compares `ledger` with the requested benchmark.
    async fn compare_with_benchmark(
        &self,
        ledger: &Ledger,
        request: &PerformanceRequest,
    ) -> Result<BenchmarkComparison>;
}

pub struct PerformanceService {
    price_lookup: Arc<dyn PriceLookupTrait>,
    default_benchmark: String,
}

impl PerformanceService {
    pub fn new(price_lookup: Arc<dyn PriceLookupTrait>) -> Self {
        Self::with_benchmark(price_lookup, DEFAULT_BENCHMARK_TICKER)
    }

    pub fn with_benchmark(price_lookup: Arc<dyn PriceLookupTrait>, benchmark: &str) -> Self {
        Self {
            price_lookup,
            default_benchmark: normalize_symbol(benchmark),
        }
    }

    pub fn default_benchmark(&self) -> &str {
        &self.default_benchmark
    }

    /// Histories of every held symbol. Symbols without market data are left
    /// out so the calculator reports them as skipped; other failures abort.
    async fn fetch_asset_histories(
        &self,
        ledger: &Ledger,
        start: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>> {
        let mut histories = HashMap::new();
        for symbol in ledger.symbols() {
            match self.price_lookup.price_history(&symbol, start).await {
                Ok(series) if series.is_empty() => {
                    debug!("Empty history for {} since {}", symbol, start);
                }
                Ok(series) => {
                    histories.insert(symbol, series);
                }
                Err(Error::MarketData(e)) => {
                    warn!("Skipping {} in performance: {}", symbol, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(histories)
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    fn request(
        &self,
        benchmark: Option<&str>,
        analysis_start: Option<NaiveDate>,
    ) -> Result<PerformanceRequest> {
        let today = today();
        let analysis_start = analysis_start.unwrap_or_else(|| start_of_year(today));
        if analysis_start > today {
            return Err(ValidationError::InvalidRange {
                start: analysis_start,
                end: today,
            }
            .into());
        }

        let benchmark = match benchmark.map(normalize_symbol) {
            Some(symbol) if !symbol.is_empty() => symbol,
            _ => self.default_benchmark.clone(),
        };

        Ok(PerformanceRequest {
            benchmark,
            analysis_start,
        })
    }

    async fn compare_with_benchmark(
        &self,
        ledger: &Ledger,
        request: &PerformanceRequest,
    ) -> Result<BenchmarkComparison> {
        debug!(
            "Comparing {} positions with {} since {}",
            ledger.symbols().len(),
            request.benchmark,
            request.analysis_start
        );

        if ledger.positions().next().is_none() {
            return Err(PerformanceError::InsufficientHistory(
                "portfolio has no open positions".into(),
            )
            .into());
        }

        let benchmark = self
            .price_lookup
            .price_history(&request.benchmark, request.analysis_start)
            .await?;
        let asset_prices = self
            .fetch_asset_histories(ledger, request.analysis_start)
            .await?;

        calculate_benchmark_comparison(
            &request.benchmark,
            &benchmark,
            &asset_prices,
            ledger,
            request.analysis_start,
        )
    }
}
