use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::UserPortfolioDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::user_portfolios::dsl::*;
use folio_core::errors::{PersistenceError, Result};
use folio_core::identity::Identity;
use folio_core::ledger::{Ledger, LedgerRepositoryTrait, PortfolioDocument, StoredLedger};

/// Shared-table store: every identity's document lives in `user_portfolios`.
pub struct SqliteLedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteLedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteLedgerRepository { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for SqliteLedgerRepository {
    fn load(&self, identity: &Identity) -> Result<StoredLedger> {
        let mut conn = get_connection(&self.pool)?;
        let row = user_portfolios
            .filter(username.eq(identity.as_str()))
            .select(UserPortfolioDB::as_select())
            .first::<UserPortfolioDB>(&mut conn)
            .optional()
            .into_core()?;

        match row {
            Some(row) => row.into_stored(),
            None => {
                debug!("No stored portfolio for {}, starting empty", identity);
                Ok(StoredLedger::default())
            }
        }
    }

    async fn save(
        &self,
        identity: &Identity,
        ledger: &Ledger,
        expected_version: i64,
    ) -> Result<i64> {
        let key = identity.as_str().to_string();
        let json = PortfolioDocument::from(ledger).to_json()?;

        self.writer
            .exec(move |conn| {
                let found: i64 = user_portfolios
                    .filter(username.eq(&key))
                    .select(version)
                    .first::<i64>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .unwrap_or(0);

                if found != expected_version {
                    return Err(PersistenceError::VersionConflict {
                        identity: key,
                        expected: expected_version,
                        found,
                    }
                    .into());
                }

                let next_version = found + 1;
                let now = Utc::now().naive_utc();
                if found == 0 {
                    diesel::insert_into(user_portfolios)
                        .values(&UserPortfolioDB {
                            username: key.clone(),
                            json_data: json,
                            version: next_version,
                            updated_at: now,
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                } else {
                    diesel::update(user_portfolios.filter(username.eq(&key)))
                        .set((
                            json_data.eq(json),
                            version.eq(next_version),
                            updated_at.eq(now),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                debug!("Stored portfolio of {} at version {}", key, next_version);
                Ok(next_version)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, run_migrations, spawn_writer};
    use chrono::NaiveDate;
    use folio_core::errors::Error;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    /// Creates a repository over a fresh temp database. The temp dir must be
    /// kept alive for the duration of the test.
    fn create_test_repository() -> (SqliteLedgerRepository, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let repo = SqliteLedgerRepository::new(Arc::clone(&pool), writer);
        (repo, pool, temp_dir)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.buy("AAPL", dec!(100), dec!(10), date(1, 5)).unwrap();
        ledger.buy("AAPL", dec!(120), dec!(10), date(1, 20)).unwrap();
        ledger.sell("AAPL", dec!(150), dec!(5), date(2, 10)).unwrap();
        ledger
    }

    #[tokio::test]
    async fn test_load_unknown_identity_is_empty() {
        let (repo, _pool, _dir) = create_test_repository();
        let stored = repo.load(&Identity::user("nobody").unwrap()).unwrap();
        assert!(stored.ledger.is_empty());
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (repo, _pool, _dir) = create_test_repository();
        let alice = Identity::user("alice").unwrap();
        let ledger = sample_ledger();

        assert_eq!(repo.save(&alice, &ledger, 0).await.unwrap(), 1);
        let stored = repo.load(&alice).unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.ledger, ledger);

        let mut updated = stored.ledger.clone();
        updated.delete("AAPL");
        assert_eq!(repo.save(&alice, &updated, 1).await.unwrap(), 2);
        assert_eq!(repo.load(&alice).unwrap().ledger, updated);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected_and_leaves_document_unchanged() {
        let (repo, _pool, _dir) = create_test_repository();
        let alice = Identity::user("alice").unwrap();
        repo.save(&alice, &sample_ledger(), 0).await.unwrap();

        // Two requests loaded version 1; the first one wins.
        let mut first = sample_ledger();
        first.delete("AAPL");
        repo.save(&alice, &first, 1).await.unwrap();

        let err = repo.save(&alice, &sample_ledger(), 1).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Persistence(PersistenceError::VersionConflict {
                expected: 1,
                found: 2,
                ..
            })
        ));

        let stored = repo.load(&alice).unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.ledger, first);
    }

    #[tokio::test]
    async fn test_stored_json_uses_document_keys() {
        let (repo, pool, _dir) = create_test_repository();
        let alice = Identity::user("Alice").unwrap();
        repo.save(&alice, &sample_ledger(), 0).await.unwrap();

        let mut conn = get_connection(&pool).unwrap();
        let stored: String = user_portfolios
            .filter(username.eq("alice"))
            .select(json_data)
            .first(&mut conn)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(value["portefeuille"]["AAPL"]["qty"].as_f64(), Some(15.0));
        assert_eq!(value["ventes"][0]["gain"].as_f64(), Some(200.0));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_serialization_error() {
        let (repo, pool, _dir) = create_test_repository();
        let mut conn = get_connection(&pool).unwrap();
        diesel::sql_query(
            "INSERT INTO user_portfolios (username, json_data, version) VALUES ('bob', 'not json', 1)",
        )
        .execute(&mut conn)
        .unwrap();

        let err = repo.load(&Identity::user("bob").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::Persistence(PersistenceError::Serialization(_))
        ));
    }
}
