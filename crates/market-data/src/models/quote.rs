use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market data quote
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol as requested from the provider (e.g. "AAPL", "CW8.PA")
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Source of the quote (YAHOO, MANUAL, ...)
    pub source: String,
}

impl Quote {
    pub fn new(symbol: String, timestamp: DateTime<Utc>, close: Decimal, source: String) -> Self {
        Self {
            symbol,
            timestamp,
            close,
            source,
        }
    }

    /// Trading date of the quote (UTC calendar day).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
