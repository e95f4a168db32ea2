//! Signed-message history.
//!
//! History is an explicit store handed to callers rather than ambient global
//! state. Two implementations: in-memory for tests and short-lived sessions,
//! and a JSON file for persistence across runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::HistoryError;
use ethsig_verify::rfc3339_timestamp;

/// One signed message record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub message: String,
    pub signature: String,
    pub signed_at: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(message: String, signature: String) -> Self {
        Self {
            message,
            signature,
            signed_at: rfc3339_timestamp(),
        }
    }
}

/// Store interface for signing history.
pub trait HistoryStore: Send + Sync {
    /// Append an entry.
    fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError>;

    /// All entries, oldest first.
    fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Remove all entries.
    fn clear(&self) -> Result<(), HistoryError>;
}

/// In-memory history.
#[derive(Default)]
pub struct InMemoryHistory {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistory {
    fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries
            .write()
            .expect("history lock poisoned")
            .push(entry);
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.read().expect("history lock poisoned").clone())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        self.entries.write().expect("history lock poisoned").clear();
        Ok(())
    }
}

/// History persisted as a JSON file, loaded on open and rewritten on every
/// mutation.
pub struct JsonFileHistory {
    path: PathBuf,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl JsonFileHistory {
    /// Open a history file, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HistoryStore for JsonFileHistory {
    fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.entries.write().expect("history lock poisoned");
        entries.push(entry);
        self.save(&entries)
    }

    fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.read().expect("history lock poisoned").clone())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        let mut entries = self.entries.write().expect("history lock poisoned");
        entries.clear();
        self.save(&entries)
    }
}
