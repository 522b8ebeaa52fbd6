use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnData {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Final-date values of the comparison series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub end_date: NaiveDate,
    /// Benchmark return since the first trading date, in percent.
    pub benchmark_return: Decimal,
    /// Return of the open positions excluding realized gains, in percent.
    pub unrealized_return: Decimal,
    /// Return including realized gains booked in the window, in percent.
    pub total_return: Decimal,
    /// Realized gains booked in the window, in currency.
    pub realized_gain: Decimal,
}

/// Portfolio performance compared with a benchmark, aligned on the
/// benchmark's trading dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub benchmark: String,
    pub analysis_start: NaiveDate,
    pub initial_value: Decimal,
    pub benchmark_return: Vec<ReturnData>,
    pub portfolio_value: Vec<ReturnData>,
    pub realized_gain: Vec<ReturnData>,
    pub unrealized_return: Vec<ReturnData>,
    pub total_return: Vec<ReturnData>,
    /// Open positions left out because no price could be resolved.
    pub skipped_symbols: Vec<String>,
    pub summary: PerformanceSummary,
}

impl BenchmarkComparison {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.benchmark_return.iter().map(|r| r.date).collect()
    }
}

/// Parameters of a performance request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    pub benchmark: String,
    pub analysis_start: NaiveDate,
}
