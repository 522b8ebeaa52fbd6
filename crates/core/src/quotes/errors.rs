//! Quote-related error types.

use thiserror::Error;

use folio_market_data::MarketDataError as ExternalMarketDataError;

/// Errors that can occur during price lookups.
///
/// This error type bridges between the market-data crate's detailed error types
/// and the domain's error handling needs.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No price could be obtained for the symbol.
    #[error("Price unavailable for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    /// The provider answered but had nothing for the requested window.
    #[error("No market data for {0}")]
    NoData(String),

    /// The provider itself could not be used (construction, configuration).
    #[error("Market data provider error: {0}")]
    Provider(String),
}

impl MarketDataError {
    /// Classifies a failed lookup for `symbol`.
    pub fn price_unavailable(symbol: &str, error: &ExternalMarketDataError) -> Self {
        match error {
            ExternalMarketDataError::NoDataForRange => MarketDataError::NoData(symbol.to_string()),
            other => MarketDataError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<ExternalMarketDataError> for MarketDataError {
    fn from(error: ExternalMarketDataError) -> Self {
        MarketDataError::Provider(error.to_string())
    }
}
