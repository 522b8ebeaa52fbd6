//! Database model for user portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use folio_core::errors::Result;
use folio_core::ledger::{PortfolioDocument, StoredLedger};

/// One row per identity; `json_data` holds the portfolio document.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::user_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserPortfolioDB {
    pub username: String,
    pub json_data: String,
    pub version: i64,
    pub updated_at: NaiveDateTime,
}

impl UserPortfolioDB {
    pub fn into_stored(self) -> Result<StoredLedger> {
        let document = PortfolioDocument::from_json(&self.json_data)?;
        Ok(StoredLedger {
            ledger: document.into(),
            version: self.version,
        })
    }
}
