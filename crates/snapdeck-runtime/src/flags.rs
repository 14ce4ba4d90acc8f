#![forbid(unsafe_code)]

//! Durable key-value flags (one-shot reveals and similar markers).
//!
//! The navigation layer only ever needs "has this happened on this device".
//! Failures are reported to the caller, which is expected to degrade to
//! "not yet" rather than fail.
//!
//! # File Format
//!
//! [`FileFlagStore`] keeps a flat JSON object:
//!
//! ```json
//! { "nomad.edgeHints.peeked.v1": "1" }
//! ```
//!
//! Writes use a temp-file-then-rename pattern to prevent corruption on crash.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from a durable flag backend.
#[derive(Debug, Error)]
pub enum FlagStoreError {
    #[error("flag store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("flag store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable string flags keyed by name.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, FlagStoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), FlagStoreError>;
}

/// Process-local flags; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, String>,
}

impl MemoryFlagStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, FlagStoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FlagStoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Flags persisted as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FileFlagStore {
    path: PathBuf,
}

impl FileFlagStore {
    /// Store backed by `path`. The file is created on first write; its
    /// parent directory must already exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, FlagStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), FlagStoreError> {
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FlagStore for FileFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, FlagStoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FlagStoreError> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        self.save(&values)
    }
}
