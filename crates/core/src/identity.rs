//! Storage identity of a portfolio.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SINGLE_TENANT_KEY;
use crate::errors::{Result, ValidationError};

/// Key under which a ledger is persisted.
///
/// Usernames are case-insensitive: they are trimmed and lower-cased, so
/// "Alice" and " alice " address the same portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn user(username: &str) -> Result<Self> {
        let normalized = username.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::MissingField("username".to_string()).into());
        }
        Ok(Identity(normalized))
    }

    /// Fixed key used by single-tenant deployments.
    pub fn single_tenant() -> Self {
        Identity(SINGLE_TENANT_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
