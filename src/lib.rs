//! Vocabulary registry enrichment core.
//!
//! Re-exports the member crates so downstream tools depend on one package:
//!
//! - [`record`]: the record document, its stores and the version/location registry.
//! - [`summary`]: RDF dump ingestion, the summarization engine and the summary writer.
//! - [`guard`]: the TTL-bounded mutation guard.

pub use vocab_guard as guard;
pub use vocab_record as record;
pub use vocab_summary as summary;
