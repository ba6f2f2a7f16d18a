//! Vocabulary record documents.
//!
//! A record describes one published vocabulary: its versions, where each
//! version can be reached (dump, endpoint, homepage), and an optional computed
//! summary per version. Every enrichment step follows the same cycle:
//!
//! ```text
//!   RecordStore ──read──► RecordAccessor::load ──► mutate ──► persist ──write──► RecordStore
//! ```
//!
//! - [`model`]: the typed record, version ordering and location identity.
//! - [`summary`]: the persisted summary subtree.
//! - [`accessor`]: load/persist/update and restartable version iteration.
//! - [`registry`]: location and registry upserts.
//! - [`store`]: file and in-memory byte stores.

pub mod accessor;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod summary;

pub use accessor::{RecordAccessor, RecordVersions, UpdateOutcome, VersionNotice, VersionSequence};
pub use config::StoreConfig;
pub use error::{check_path_component, RecordError};
pub use model::{
    version_order, Location, LocationType, Namespace, Registry, Version, VocabularyRecord,
};
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore};
pub use summary::{
    LevelDoc, LiteralsDoc, NameCount, NamespaceCount, ObjectsDoc, PartitionDoc, StatementsDoc,
    SummaryDoc,
};
