//! Ledger-backed portfolio session: trades, undo, and live position views.

pub mod holdings_model;
pub mod holdings_service;

#[cfg(test)]
mod holdings_service_tests;

pub use holdings_model::*;
pub use holdings_service::*;
