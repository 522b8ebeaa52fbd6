//! Folio Market Data Crate
//!
//! Provider-agnostic market data fetching for the Folio portfolio tracker.
//!
//! The crate exposes two operations that the domain layer needs:
//! - the latest traded price of a symbol
//! - the daily closing history of a symbol over a date range
//!
//! # Core Types
//!
//! - [`Quote`] - A single priced observation (closing/current price plus timestamp)
//! - [`MarketDataProvider`] - Trait implemented by every data source
//! - [`YahooProvider`] - Yahoo Finance implementation
//! - [`MarketDataError`] - Errors with a [`RetryClass`] classification

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use models::Quote;
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
