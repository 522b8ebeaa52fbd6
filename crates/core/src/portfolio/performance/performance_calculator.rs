use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::performance_model::{BenchmarkComparison, PerformanceSummary, ReturnData};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{PerformanceError, Result};
use crate::ledger::Ledger;
use crate::quotes::PriceSeries;
use crate::utils::decimal_utils::checked;

/// Compares the ledger's open positions with a benchmark over the benchmark's
/// trading dates.
///
/// Every position's price series is reindexed onto the benchmark dates, gaps
/// filled forward then backward. Positions without any resolvable price are
/// skipped and reported in `skipped_symbols`. Sales dated from
/// `analysis_start` onwards add their realized gain to the total-return
/// series from their sale date on.
///
/// # Arguments
///
/// * `benchmark_symbol` - Ticker of the benchmark, echoed in the result.
/// * `benchmark` - Benchmark closing prices; its dates form the output index.
/// * `asset_prices` - Closing prices per held symbol over the same window.
/// * `ledger` - Open positions (current quantities) and sale history.
/// * `analysis_start` - First date of the analysis window.
///
/// Fails with `InsufficientHistory` when the benchmark has no usable data or
/// the initial portfolio value is zero (no positions, or none priced).
pub fn calculate_benchmark_comparison(
    benchmark_symbol: &str,
    benchmark: &PriceSeries,
    asset_prices: &HashMap<String, PriceSeries>,
    ledger: &Ledger,
    analysis_start: NaiveDate,
) -> Result<BenchmarkComparison> {
    let dates = benchmark.dates();
    let first_benchmark = match benchmark.first() {
        Some(point) if !point.close.is_zero() => point.close,
        Some(_) => {
            return Err(PerformanceError::InsufficientHistory(format!(
                "first {} price is zero",
                benchmark_symbol
            ))
            .into())
        }
        None => {
            return Err(PerformanceError::InsufficientHistory(format!(
                "no {} prices since {}",
                benchmark_symbol, analysis_start
            ))
            .into())
        }
    };

    if ledger.positions().next().is_none() {
        return Err(
            PerformanceError::InsufficientHistory("portfolio has no open positions".into()).into(),
        );
    }

    // --- 1. Portfolio market value on every benchmark date ---
    let mut portfolio_value = vec![Decimal::ZERO; dates.len()];
    let mut initial_value = Decimal::ZERO;
    let mut skipped_symbols = Vec::new();

    for position in ledger.positions() {
        let aligned = asset_prices
            .get(&position.symbol)
            .and_then(|series| series.align_to(&dates));
        let Some(aligned) = aligned else {
            warn!(
                "No price data for {} in the analysis window, excluding it",
                position.symbol
            );
            skipped_symbols.push(position.symbol.clone());
            continue;
        };

        for (value, price) in portfolio_value.iter_mut().zip(&aligned) {
            let holding = checked(price.checked_mul(position.quantity), "portfolio value")?;
            *value = checked(value.checked_add(holding), "portfolio value")?;
        }
        initial_value = portfolio_value_at_start(initial_value, aligned[0], position.quantity)?;
    }

    if initial_value.is_zero() {
        return Err(PerformanceError::InsufficientHistory(
            "initial portfolio value is zero".into(),
        )
        .into());
    }

    // --- 2. Cumulative realized gains (step function) ---
    let realized_gain = cumulative_realized_gains(ledger, &dates, analysis_start)?;

    // --- 3. Percentage series ---
    let mut benchmark_return = Vec::with_capacity(dates.len());
    let mut value_series = Vec::with_capacity(dates.len());
    let mut realized_series = Vec::with_capacity(dates.len());
    let mut unrealized_return = Vec::with_capacity(dates.len());
    let mut total_return = Vec::with_capacity(dates.len());

    for (i, date) in dates.iter().enumerate() {
        let bench_price = benchmark.get(date).unwrap_or(first_benchmark);
        let value = portfolio_value[i];
        let realized = realized_gain[i];
        let total_value = checked(value.checked_add(realized), "total value")?;

        benchmark_return.push(ReturnData {
            date: *date,
            value: percent_change(bench_price, first_benchmark)?,
        });
        value_series.push(ReturnData { date: *date, value });
        realized_series.push(ReturnData {
            date: *date,
            value: realized,
        });
        unrealized_return.push(ReturnData {
            date: *date,
            value: percent_change(value, initial_value)?,
        });
        total_return.push(ReturnData {
            date: *date,
            value: percent_change(total_value, initial_value)?,
        });
    }

    let last = dates.len() - 1;
    let summary = PerformanceSummary {
        end_date: dates[last],
        benchmark_return: benchmark_return[last].value,
        unrealized_return: unrealized_return[last].value,
        total_return: total_return[last].value,
        realized_gain: realized_gain[last],
    };

    debug!(
        "Benchmark comparison over {} dates: benchmark {}%, unrealized {}%, total {}%",
        dates.len(),
        summary.benchmark_return,
        summary.unrealized_return,
        summary.total_return
    );

    Ok(BenchmarkComparison {
        benchmark: benchmark_symbol.to_string(),
        analysis_start,
        initial_value,
        benchmark_return,
        portfolio_value: value_series,
        realized_gain: realized_series,
        unrealized_return,
        total_return,
        skipped_symbols,
        summary,
    })
}

/// Running sum of realized gains for sales dated in `[analysis_start, date]`,
/// evaluated on each of `dates` (ascending).
fn cumulative_realized_gains(
    ledger: &Ledger,
    dates: &[NaiveDate],
    analysis_start: NaiveDate,
) -> Result<Vec<Decimal>> {
    let mut sales: Vec<(NaiveDate, Decimal)> = ledger
        .sales()
        .iter()
        .filter(|s| s.sale_date >= analysis_start)
        .map(|s| (s.sale_date, s.realized_gain))
        .collect();
    sales.sort_by_key(|(date, _)| *date);

    let mut result = Vec::with_capacity(dates.len());
    let mut running = Decimal::ZERO;
    let mut next = 0;
    for date in dates {
        while next < sales.len() && sales[next].0 <= *date {
            running = checked(running.checked_add(sales[next].1), "realized gain")?;
            next += 1;
        }
        result.push(running);
    }
    Ok(result)
}

fn portfolio_value_at_start(total: Decimal, price: Decimal, quantity: Decimal) -> Result<Decimal> {
    let holding = checked(price.checked_mul(quantity), "initial value")?;
    checked(total.checked_add(holding), "initial value")
}

/// `(current / base - 1) * 100`; `base` must be non-zero.
fn percent_change(current: Decimal, base: Decimal) -> Result<Decimal> {
    let change = current
        .checked_div(base)
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    Ok(checked(change, "return")?.round_dp(DECIMAL_PRECISION))
}
