use async_trait::async_trait;

use super::ledger_model::Ledger;
use crate::errors::Result;
use crate::identity::Identity;

/// A ledger together with the version of the stored document it was read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredLedger {
    pub ledger: Ledger,
    /// 0 when nothing has been stored yet for the identity.
    pub version: i64,
}

/// Persistence contract for ledgers, one document per identity.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Loads the ledger of `identity`, or an empty ledger at version 0.
    fn load(&self, identity: &Identity) -> Result<StoredLedger>;

    /// Replaces the stored document of `identity` with `ledger`.
    ///
    /// Fails with `PersistenceError::VersionConflict` when the stored version
    /// differs from `expected_version`. Returns the new version.
    async fn save(&self, identity: &Identity, ledger: &Ledger, expected_version: i64)
        -> Result<i64>;
}
