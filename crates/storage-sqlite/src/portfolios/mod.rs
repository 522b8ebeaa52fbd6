//! SQLite storage implementation for user portfolios.

mod model;
mod repository;

pub use model::UserPortfolioDB;
pub use repository::SqliteLedgerRepository;

// Re-export trait from core for convenience
pub use folio_core::ledger::LedgerRepositoryTrait;
