//! Durable storage for the visit history.
//!
//! The tracker writes the full history blob after every accepted fix and
//! reads it back once at startup. The blob is the `LocationRecord` list as
//! JSON, stable and versionless; the frequency map is never stored, it is
//! rebuilt by replaying the history.

use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::LocationRecord;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the persisted history, oldest first. Missing storage is an
    /// empty history, not an error.
    async fn load(&self) -> Result<Vec<LocationRecord>>;

    /// Replace the persisted history with `history`.
    async fn save(&self, history: &[LocationRecord]) -> Result<()>;
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<LocationRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what has been "persisted", for assertions.
    pub fn stored(&self) -> Vec<LocationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Vec<LocationRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn save(&self, history: &[LocationRecord]) -> Result<()> {
        *self.records.lock().unwrap() = history.to_vec();
        Ok(())
    }
}

/// Single-file JSON store.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create history directory {}", parent.display())
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn load(&self) -> Result<Vec<LocationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read history from {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid history blob in {}", self.path.display()))
    }

    async fn save(&self, history: &[LocationRecord]) -> Result<()> {
        let serialized = serde_json::to_string(history)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write history to {}", self.path.display()))
    }
}
