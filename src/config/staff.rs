//! Staff directory - maps Discord user IDs to operator usernames.
//!
//! The directory is the identity collaborator for every ledger command: the
//! username it resolves is what gets recorded as a sale's operator and a
//! product's owner. Discord users that are not listed cannot use the ledger.

use serde::Deserialize;
use std::collections::HashMap;

/// One `[[staff]]` entry of config.toml
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StaffMember {
    /// Discord user ID (snowflake, as a string)
    pub discord_id: String,
    /// Operator username recorded on products and transactions
    pub username: String,
}

/// Lookup table from Discord user ID to operator username.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    operators: HashMap<String, String>,
}

impl StaffDirectory {
    /// Builds the directory from config entries. Later entries win on duplicate IDs.
    #[must_use]
    pub fn new(members: &[StaffMember]) -> Self {
        let operators = members
            .iter()
            .filter(|m| !m.username.trim().is_empty())
            .map(|m| (m.discord_id.trim().to_string(), m.username.trim().to_string()))
            .collect();
        Self { operators }
    }

    /// Gets the operator username for a Discord user, if registered.
    #[must_use]
    pub fn operator_for(&self, discord_id: &str) -> Option<&str> {
        self.operators.get(discord_id).map(String::as_str)
    }

    /// Number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether no operator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
