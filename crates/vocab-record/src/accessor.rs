//! Record Accessor: load/parse, serialize/persist, and version iteration.
//!
//! There is no caching: every operation is its own load → mutate → persist
//! round trip against the injected [`RecordStore`]. Two writers touching the
//! same identifier concurrently are last-writer-wins at document granularity.

use crate::error::RecordError;
use crate::model::{Version, VocabularyRecord};
use crate::store::RecordStore;
use std::sync::Arc;

/// Whether a mutation found its target and was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Written,
    /// The addressed version does not exist; nothing was persisted.
    VersionMissing,
}

fn encode<T: serde::Serialize>(id: &str, value: &T) -> Result<Vec<u8>, RecordError> {
    serde_json::to_vec_pretty(value).map_err(|e| RecordError::serialize(id, e.to_string()))
}

#[derive(Clone)]
pub struct RecordAccessor {
    store: Arc<dyn RecordStore>,
}

impl RecordAccessor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn load(&self, id: &str) -> Result<VocabularyRecord, RecordError> {
        let bytes = self.store.read(id)?;
        let record: VocabularyRecord =
            serde_json::from_slice(&bytes).map_err(|e| RecordError::parse(id, e.to_string()))?;
        if record.id != id {
            return Err(RecordError::parse(
                id,
                format!("document carries id `{}`", record.id),
            ));
        }
        tracing::debug!(id = %id, versions = record.versions.len(), "loaded record");
        Ok(record)
    }

    pub fn persist(&self, id: &str, record: &VocabularyRecord) -> Result<(), RecordError> {
        let bytes = encode(id, record)?;
        self.store.write(id, &bytes)?;
        tracing::debug!(id = %id, bytes = bytes.len(), "persisted record");
        Ok(())
    }

    /// Load, apply `mutate`, and persist when it reports [`UpdateOutcome::Written`].
    pub fn update<F>(&self, id: &str, mutate: F) -> Result<UpdateOutcome, RecordError>
    where
        F: FnOnce(&mut VocabularyRecord) -> UpdateOutcome,
    {
        let mut record = self.load(id)?;
        let outcome = mutate(&mut record);
        if outcome == UpdateOutcome::Written {
            self.persist(id, &record)?;
        }
        Ok(outcome)
    }

    /// Restartable handle over `(record, version)` pairs for `id`.
    pub fn versions(&self, id: &str) -> RecordVersions {
        RecordVersions {
            accessor: self.clone(),
            id: id.to_string(),
        }
    }
}

// ============================================================================
// Version iteration
// ============================================================================

/// Side-channel notice produced when a sequence is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionNotice {
    NoVersions,
}

/// Each [`start`](RecordVersions::start) reloads the record.
#[derive(Clone)]
pub struct RecordVersions {
    accessor: RecordAccessor,
    id: String,
}

impl RecordVersions {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> Result<VersionSequence, RecordError> {
        let record = self.accessor.load(&self.id)?;
        let mut versions = record.versions.clone();
        versions.sort_by(crate::model::version_order);

        let notice = if versions.is_empty() {
            tracing::info!(id = %self.id, "no versions found");
            Some(VersionNotice::NoVersions)
        } else {
            None
        };

        Ok(VersionSequence {
            record: Arc::new(record),
            versions: versions.into_iter(),
            notice,
        })
    }
}

/// Finite, version-ordered sequence from one load.
pub struct VersionSequence {
    record: Arc<VocabularyRecord>,
    versions: std::vec::IntoIter<Version>,
    notice: Option<VersionNotice>,
}

impl VersionSequence {
    pub fn notice(&self) -> Option<VersionNotice> {
        self.notice
    }

    pub fn record(&self) -> &Arc<VocabularyRecord> {
        &self.record
    }
}

impl Iterator for VersionSequence {
    type Item = (Arc<VocabularyRecord>, Version);

    fn next(&mut self) -> Option<Self::Item> {
        self.versions
            .next()
            .map(|version| (Arc::clone(&self.record), version))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.versions.size_hint()
    }
}
