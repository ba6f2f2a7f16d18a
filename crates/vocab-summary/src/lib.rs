//! RDF statistics for vocabulary versions.
//!
//! A dump is parsed once (trying the guessed format, then RDF/XML, then Turtle)
//! and every statement is fed to a [`Summarizer`]. The resulting [`Summary`] is
//! converted to the persisted [`vocab_record::SummaryDoc`] subtree and written
//! onto its version by [`write_summary`].
//!
//! - [`term`]: owned RDF terms.
//! - [`namespace`]: prefix table and `(prefix, local)` resolution.
//! - [`ingest`]: format guessing and `rio` parsing.
//! - [`engine`]: the single-pass aggregator.
//! - [`writer`]: summary ⇄ document conversion and the record write.
//! - [`pipeline`]: summarize every cached dump of a record.

pub mod engine;
pub mod error;
pub mod ingest;
pub mod namespace;
pub mod pipeline;
pub mod term;
pub mod writer;

pub use engine::{
    summarize, summarize_bytes, summarize_file, LiteralPartition, ObjectStats, Partition,
    RoleStats, Summarizer, Summary,
};
pub use error::SummarizeError;
pub use ingest::{parse_into, RdfFormat};
pub use namespace::{split_iri, NamespaceTable, QName};
pub use pipeline::{
    source_location, CachedDump, DumpCache, FsDumpCache, PipelineReport, SummaryPipeline,
    WrittenSummary,
};
pub use term::{RdfLiteral, RdfTerm, RdfTriple};
pub use writer::write_summary;
