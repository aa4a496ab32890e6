//! Blocklist policy gate.
//!
//! File format, one entry per line:
//! - `user@example.com` rejects that exact address
//! - `@example.com` rejects every address at that domain
//! - blank lines and lines starting with `#` are ignored
//!
//! Matching is case-insensitive.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use domain::{PolicyGate, PolicyGateError, EMAIL_DELIMITER};

/// In-memory policy gate rejecting listed addresses and domains.
#[derive(Debug, Clone, Default)]
pub struct BlocklistGate {
    addresses: HashSet<String>,
    domains: HashSet<String>,
}

impl BlocklistGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse blocklist entries in the file format described above.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .fold(Self::default(), |gate, entry| gate.with_entry(entry.as_ref()))
    }

    /// Load a blocklist file.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let gate = Self::from_entries(contents.lines());
        debug!(
            path = %path.display(),
            addresses = gate.addresses.len(),
            domains = gate.domains.len(),
            "loaded blocklist"
        );
        Ok(gate)
    }

    /// Add one entry; comments and blank entries are ignored.
    pub fn with_entry(mut self, entry: &str) -> Self {
        let entry = entry.trim();
        if entry.is_empty() || entry.starts_with('#') {
            return self;
        }

        let entry = entry.to_lowercase();
        match entry.strip_prefix(EMAIL_DELIMITER) {
            Some(domain) => {
                self.domains.insert(domain.to_string());
            }
            None => {
                self.addresses.insert(entry);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.addresses.len() + self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn blocks(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        if self.addresses.contains(&value) {
            return true;
        }
        value
            .split_once(EMAIL_DELIMITER)
            .is_some_and(|(_, domain)| self.domains.contains(domain))
    }
}

#[async_trait]
impl PolicyGate for BlocklistGate {
    async fn is_rejected(&self, value: &str) -> Result<bool, PolicyGateError> {
        Ok(self.blocks(value))
    }
}
