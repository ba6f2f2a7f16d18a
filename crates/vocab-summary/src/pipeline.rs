//! Summarize every cached dump of a record.

use crate::engine::summarize_file;
use crate::error::SummarizeError;
use crate::writer::write_summary;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vocab_record::{
    check_path_component, Location, LocationType, RecordAccessor, StoreConfig, UpdateOutcome,
    Version,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDump {
    pub path: PathBuf,
}

/// Where previously fetched dumps can be found.
pub trait DumpCache: Send + Sync {
    fn cached_dump(&self, id: &str, version: &str) -> Result<Option<CachedDump>, SummarizeError>;
}

/// Dumps laid out as `<dir>/<id>/<version>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsDumpCache {
    dir: PathBuf,
}

impl FsDumpCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// `label` itself or `label.<anything>`, so `"1"` never claims `"10.ttl"`.
fn names_version(file_name: &str, label: &str) -> bool {
    match file_name.strip_prefix(label) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

impl DumpCache for FsDumpCache {
    fn cached_dump(&self, id: &str, version: &str) -> Result<Option<CachedDump>, SummarizeError> {
        check_path_component(id)?;
        let dir = self.dir.join(id);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SummarizeError::Upstream {
                    path: dir.display().to_string(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SummarizeError::Upstream {
                path: dir.display().to_string(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                if names_version(name, version) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        Ok(names.into_iter().next().map(|name| CachedDump {
            path: dir.join(name),
        }))
    }
}

/// Locations a cached dump can stand for, most preferred first: the
/// published location, then the cache's own copy.
const SOURCE_PREFERENCE: [(LocationType, Option<&str>); 4] = [
    (LocationType::Endpoint, None),
    (LocationType::Dump, None),
    (LocationType::Endpoint, Some("cache")),
    (LocationType::Dump, Some("cache")),
];

/// The location a version's summary is attributed to.
pub fn source_location(version: &Version) -> Option<&Location> {
    SOURCE_PREFERENCE
        .iter()
        .find_map(|(kind, recipe)| version.location(*kind, *recipe))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSummary {
    pub version: String,
    /// URI of [`source_location`], if the version lists one.
    pub source: Option<String>,
    pub triples: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Versions whose summary was written.
    pub written: Vec<WrittenSummary>,
    /// Versions with no cached dump.
    pub skipped: Vec<String>,
}

impl PipelineReport {
    pub fn written_versions(&self) -> Vec<&str> {
        self.written.iter().map(|w| w.version.as_str()).collect()
    }
}

pub struct SummaryPipeline {
    accessor: RecordAccessor,
    cache: Arc<dyn DumpCache>,
}

impl SummaryPipeline {
    pub fn new(accessor: RecordAccessor, cache: Arc<dyn DumpCache>) -> Self {
        Self { accessor, cache }
    }

    /// Summarize and write each version of `id` that has a cached dump.
    ///
    /// Stops on the first error; summaries written before it stay written.
    pub fn run(&self, id: &str) -> Result<PipelineReport, SummarizeError> {
        let mut report = PipelineReport::default();

        for (_, version) in self.accessor.versions(id).start()? {
            let source = source_location(&version).map(|l| l.uri.clone());
            let label = version.version;
            let Some(dump) = self.cache.cached_dump(id, &label)? else {
                tracing::info!(id = %id, version = %label, "no cached dump; skipping");
                report.skipped.push(label);
                continue;
            };

            let summary = summarize_file(&dump.path)?;
            match write_summary(&self.accessor, id, &label, &summary)? {
                UpdateOutcome::Written => {
                    tracing::debug!(
                        id = %id,
                        version = %label,
                        source = ?source,
                        "summary attributed to source location"
                    );
                    report.written.push(WrittenSummary {
                        version: label,
                        source,
                        triples: summary.triples,
                    });
                }
                UpdateOutcome::VersionMissing => report.skipped.push(label),
            }
        }

        tracing::info!(
            id = %id,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "summary pipeline finished"
        );
        Ok(report)
    }
}
