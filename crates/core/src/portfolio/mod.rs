//! Portfolio views and analytics built on top of the ledger.

pub mod holdings;
pub mod performance;
