//! Single-file JSON ledger store.
//!
//! The file holds one object keyed by identity:
//!
//! ```json
//! { "default": { "portefeuille": { ... }, "ventes": [ ... ], "version": 3 } }
//! ```
//!
//! Documents written without a `version` key load at version 0.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::StorageError;
use folio_core::errors::{Error, PersistenceError, Result};
use folio_core::identity::Identity;
use folio_core::ledger::{Ledger, LedgerRepositoryTrait, PortfolioDocument, StoredLedger};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct VersionedDocument {
    #[serde(flatten)]
    document: PortfolioDocument,
    #[serde(default)]
    version: i64,
}

type StoreFile = BTreeMap<String, VersionedDocument>;

pub struct JsonFileLedgerRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl JsonFileLedgerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(StorageError::from)?;
            }
        }
        info!("Using JSON portfolio store at {}", path.display());
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::new());
        }
        let content = fs::read_to_string(&self.path).map_err(StorageError::from)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes to a sibling temp file then renames it over the store.
    fn write_file(&self, store: &StoreFile) -> Result<()> {
        let json = serde_json::to_string_pretty(store)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(StorageError::from)?;
        fs::rename(&tmp, &self.path).map_err(StorageError::from)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| Error::Unexpected("portfolio file lock poisoned".to_string()))
    }
}

#[async_trait]
impl LedgerRepositoryTrait for JsonFileLedgerRepository {
    fn load(&self, identity: &Identity) -> Result<StoredLedger> {
        let _guard = self.guard()?;
        let stored = self
            .read_file()?
            .remove(identity.as_str())
            .map(|entry| StoredLedger {
                ledger: entry.document.into(),
                version: entry.version,
            })
            .unwrap_or_default();
        Ok(stored)
    }

    async fn save(
        &self,
        identity: &Identity,
        ledger: &Ledger,
        expected_version: i64,
    ) -> Result<i64> {
        let _guard = self.guard()?;
        let mut store = self.read_file()?;

        let found = store
            .get(identity.as_str())
            .map(|entry| entry.version)
            .unwrap_or(0);
        if found != expected_version {
            return Err(PersistenceError::VersionConflict {
                identity: identity.to_string(),
                expected: expected_version,
                found,
            }
            .into());
        }

        let next_version = found + 1;
        store.insert(
            identity.as_str().to_string(),
            VersionedDocument {
                document: PortfolioDocument::from(ledger),
                version: next_version,
            },
        );
        self.write_file(&store)?;

        debug!("Stored portfolio of {} at version {}", identity, next_version);
        Ok(next_version)
    }
}
