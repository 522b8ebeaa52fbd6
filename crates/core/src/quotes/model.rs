//! Price series domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use folio_market_data::Quote;

/// A single closing price on a trading date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Daily closing prices indexed by trading date, in ascending date order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PriceSeries(BTreeMap<NaiveDate, Decimal>);

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from quotes; when several quotes share a date the
    /// latest timestamp wins.
    pub fn from_quotes(quotes: &[Quote]) -> Self {
        let mut sorted: Vec<&Quote> = quotes.iter().collect();
        sorted.sort_by_key(|q| q.timestamp);
        sorted.into_iter().map(|q| (q.date(), q.close)).collect()
    }

    pub fn insert(&mut self, date: NaiveDate, close: Decimal) {
        self.0.insert(date, close);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<Decimal> {
        self.0.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.0.keys().copied().collect()
    }

    pub fn first(&self) -> Option<PricePoint> {
        self.0
            .iter()
            .next()
            .map(|(date, close)| PricePoint { date: *date, close: *close })
    }

    pub fn last(&self) -> Option<PricePoint> {
        self.0
            .iter()
            .next_back()
            .map(|(date, close)| PricePoint { date: *date, close: *close })
    }

    pub fn iter(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.0
            .iter()
            .map(|(date, close)| PricePoint { date: *date, close: *close })
    }

    /// Reindexes the series onto `index`.
    ///
    /// Only prices on dates present in `index` are kept. Index dates without a
    /// price take the last known price (forward fill); dates before the first
    /// known price take that first price (backward fill). Returns `None` when
    /// no date of `index` has a price.
    pub fn align_to(&self, index: &[NaiveDate]) -> Option<Vec<Decimal>> {
        let mut forward: Vec<Option<Decimal>> = Vec::with_capacity(index.len());
        let mut carried: Option<Decimal> = None;
        for date in index {
            if let Some(close) = self.0.get(date) {
                carried = Some(*close);
            }
            forward.push(carried);
        }

        let first_known = forward.iter().flatten().next().copied()?;
        Some(
            forward
                .into_iter()
                .map(|price| price.unwrap_or(first_known))
                .collect(),
        )
    }
}

impl FromIterator<(NaiveDate, Decimal)> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: T) -> Self {
        PriceSeries(iter.into_iter().collect())
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        iter.into_iter().map(|p| (p.date, p.close)).collect()
    }
}
