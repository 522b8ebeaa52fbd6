//! Core error types for the Folio application.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, file I/O) are converted to these types by the storage layer.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::quotes::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application.
///
/// Each collaborator keeps its own error kind so callers can decide, per
/// error, whether to skip, retry, or abort.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Performance calculation failed: {0}")]
    Performance(#[from] PerformanceError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by ledger mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("No open position for symbol {0}")]
    UnknownSymbol(String),

    #[error("Insufficient quantity for {symbol}: requested {requested}, available {available}")]
    InsufficientQuantity {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Sale index {index} out of range (history has {len} sales)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that occur during performance calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerformanceError {
    #[error("Insufficient data: {0}")]
    InsufficientHistory(String),
}

/// Storage-agnostic persistence errors.
///
/// Storage crates convert their native errors (Diesel, r2d2, std::io) into
/// these variants, keeping the message in string form.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The stored document changed since it was loaded.
    #[error("Portfolio of '{identity}' was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict {
        identity: String,
        expected: i64,
        found: i64,
    },

    /// The stored document could not be encoded or decoded.
    #[error("Failed to (de)serialize portfolio document: {0}")]
    Serialization(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),

    #[error("Analysis start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.into())
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}
