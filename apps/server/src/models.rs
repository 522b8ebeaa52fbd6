use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use folio_core::catalogue::{self, CatalogueEntry};
use folio_core::constants::{DEFAULT_BENCHMARK_LABEL, DEFAULT_BENCHMARK_TICKER};
use folio_core::errors::ValidationError;
use folio_core::portfolio::holdings::TradeRequest;
use folio_core::utils::time_utils::parse_date;

/// Buy or sell order. Either `symbol` or a catalogue `name` is required;
/// `date` (YYYY-MM-DD) defaults to today.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TradeBody {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price: Decimal,
    pub quantity: Decimal,
    pub date: Option<String>,
}

impl TryFrom<TradeBody> for TradeRequest {
    type Error = folio_core::Error;

    fn try_from(body: TradeBody) -> Result<Self, Self::Error> {
        let symbol = match (body.symbol, body.name) {
            (Some(symbol), _) if !symbol.trim().is_empty() => symbol,
            (_, Some(name)) => catalogue::lookup_ticker(&name)
                .map(str::to_string)
                .ok_or_else(|| {
                    ValidationError::InvalidInput(format!("'{}' is not in the catalogue", name))
                })?,
            _ => return Err(ValidationError::MissingField("symbol".to_string()).into()),
        };
        let date = match body.date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(parse_date(d)?),
            _ => None,
        };
        Ok(TradeRequest {
            symbol,
            price: body.price,
            quantity: body.quantity,
            date,
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBody {
    /// First date of the window (YYYY-MM-DD); 1 January of this year when absent.
    pub start_date: Option<String>,
    /// Benchmark ticker; the configured benchmark when absent.
    pub benchmark: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    pub name: String,
    pub ticker: String,
    pub icon: String,
}

impl From<&CatalogueEntry> for CatalogueItem {
    fn from(entry: &CatalogueEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            ticker: entry.ticker.to_string(),
            icon: catalogue::icon_for(entry.ticker).to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkInfo {
    pub label: String,
    pub ticker: String,
}

impl BenchmarkInfo {
    /// Labels a benchmark ticker from the catalogue when it is listed there.
    pub fn for_ticker(ticker: &str) -> Self {
        let label = if ticker.eq_ignore_ascii_case(DEFAULT_BENCHMARK_TICKER) {
            DEFAULT_BENCHMARK_LABEL.to_string()
        } else {
            catalogue::entries()
                .iter()
                .find(|e| e.ticker.eq_ignore_ascii_case(ticker))
                .map(|e| e.name.to_string())
                .unwrap_or_else(|| ticker.to_string())
        };
        Self {
            label,
            ticker: ticker.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueResponse {
    pub benchmark: BenchmarkInfo,
    pub default_username: String,
    pub entries: Vec<CatalogueItem>,
}
