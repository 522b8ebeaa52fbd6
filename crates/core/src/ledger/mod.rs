//! Portfolio ledger: open positions and realized-sale history.

mod ledger_document;
mod ledger_model;
mod ledger_traits;


pub use ledger_document::{PortfolioDocument, PositionRecord, SaleRecord};
pub use ledger_model::{is_quantity_significant, normalize_symbol, Ledger, Position, RealizedSale};
pub use ledger_traits::{LedgerRepositoryTrait, StoredLedger};
