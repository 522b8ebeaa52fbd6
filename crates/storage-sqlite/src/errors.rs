//! Storage-specific error types.
//!
//! This module provides error types that wrap Diesel, r2d2 and I/O errors and
//! convert them to the storage-agnostic error types defined in `folio_core`.

use diesel::result::Error as DieselError;
use folio_core::errors::{Error, PersistenceError};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `folio_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Writer unavailable: {0}")]
    WriterUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A domain error raised inside a storage job, passed through unchanged.
    #[error(transparent)]
    Core(#[from] Error),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(e) => e,
            StorageError::Io(e) => Error::Persistence(PersistenceError::Io(e.to_string())),
            StorageError::QueryFailed(DieselError::DeserializationError(e)) => {
                Error::Persistence(PersistenceError::Serialization(e.to_string()))
            }
            other => Error::Persistence(PersistenceError::Database(other.to_string())),
        }
    }
}

/// Extension trait for easily converting Diesel Results to core Results.
///
/// This provides a `.into_core()` method on any `Result<T, diesel::result::Error>`
/// which handles the conversion through StorageError.
pub trait IntoCore<T> {
    fn into_core(self) -> folio_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> folio_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> folio_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
