//! Folio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the Folio portfolio tracker:
//! the position ledger with its average-cost and realized-gain accounting,
//! and the benchmark performance calculator. It is storage-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod catalogue;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod portfolio;
pub mod quotes;
pub mod utils;

// Re-export common domain types
pub use identity::Identity;
pub use ledger::{Ledger, Position, RealizedSale};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
