//! Byte-level persistence for record documents.
//!
//! A store only moves whole documents; parsing happens in the accessor.

use crate::config::StoreConfig;
use crate::error::{check_path_component, RecordError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read/write contract for serialized record documents.
pub trait RecordStore: Send + Sync {
    /// Full document bytes; `NotFound` if nothing is stored under `id`.
    fn read(&self, id: &str) -> Result<Vec<u8>, RecordError>;

    /// Replace the stored document. Readers see the old or the new bytes, never a mix.
    fn write(&self, id: &str, bytes: &[u8]) -> Result<(), RecordError>;
}

// ============================================================================
// File store
// ============================================================================

/// One `<id>.json` file per record under a directory.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.records_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<id>.json`; identifiers containing path separators are rejected.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, RecordError> {
        check_path_component(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl RecordStore for FileRecordStore {
    fn read(&self, id: &str) -> Result<Vec<u8>, RecordError> {
        fs::read(self.path_for(id)?).map_err(|e| RecordError::from_io(id, e))
    }

    fn write(&self, id: &str, bytes: &[u8]) -> Result<(), RecordError> {
        let upstream = |source| RecordError::Upstream {
            id: id.to_string(),
            source,
        };

        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir).map_err(upstream)?;
        // Each write gets its own temp file, so concurrent writers never share one.
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(upstream)?;
        tmp.write_all(bytes).map_err(upstream)?;
        tmp.as_file().sync_data().map_err(upstream)?;
        tmp.persist(&path).map_err(|e| upstream(e.error))?;
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps serialized bytes, so every load parses an independent copy.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes as-is (used to seed documents, including malformed ones).
    pub fn insert_raw(&self, id: &str, bytes: impl Into<Vec<u8>>) {
        self.documents.write().insert(id.to_string(), bytes.into());
    }

    pub fn raw(&self, id: &str) -> Option<Vec<u8>> {
        self.documents.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, id: &str) -> Result<Vec<u8>, RecordError> {
        self.documents
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound { id: id.to_string() })
    }

    fn write(&self, id: &str, bytes: &[u8]) -> Result<(), RecordError> {
        self.documents.write().insert(id.to_string(), bytes.to_vec());
        Ok(())
    }
}
