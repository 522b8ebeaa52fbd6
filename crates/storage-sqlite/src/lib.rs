//! Ledger storage for Folio.
//!
//! This crate implements `folio_core::ledger::LedgerRepositoryTrait` twice:
//! - [`SqliteLedgerRepository`]: one `user_portfolios` row per identity,
//!   pooled reads, writes serialized through a single writer actor
//! - [`JsonFileLedgerRepository`]: one JSON file keyed by identity, for
//!   single-tenant deployments
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                │
//!                ▼
//!     storage-sqlite (this crate)
//!          │            │
//!          ▼            ▼
//!      SQLite DB    JSON file
//! ```
//!
//! Both stores apply optimistic concurrency: a save carries the version the
//! caller loaded and fails with `VersionConflict` if the stored document moved on.

pub mod db;
pub mod errors;
pub mod file_store;
pub mod portfolios;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use file_store::JsonFileLedgerRepository;
pub use portfolios::SqliteLedgerRepository;

// Re-export from folio-core for convenience
pub use folio_core::errors::{Error, PersistenceError, Result};
