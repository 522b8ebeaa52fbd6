//! Price lookup module.
//!
//! - [`model`] - Price points and daily closing series
//! - [`service`] - `PriceLookupTrait` and its `QuoteService` implementation
//!   over a `folio_market_data` provider
//! - [`errors`] - Market data errors as seen by the domain
//!
//! ```text
//! PortfolioService / PerformanceService
//!            ↓
//!   PriceLookupTrait (QuoteService)
//!            ↓
//!   MarketDataProvider (YahooProvider)
//! ```

pub mod errors;
pub mod model;
pub mod service;


pub use errors::MarketDataError;
pub use model::{PricePoint, PriceSeries};
pub use service::{PriceLookupTrait, QuoteService};
