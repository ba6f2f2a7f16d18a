//! Summarization Engine: one pass over a triple stream.
//!
//! During the pass every IRI is split into `(namespace, local)` and counted
//! against its namespace URI; prefixes are attached in [`Summarizer::finish`],
//! once the full namespace table of the source is known. Counts keyed by a
//! namespace the table does not bind are dropped there (a resolution miss),
//! while the distinct-term sets and the raw totals keep them.
//!
//! Memory is bounded by the distinct terms plus distinct class/datatype keys.

use crate::error::SummarizeError;
use crate::ingest::{parse_into, RdfFormat};
use crate::namespace::{split_iri, NamespaceTable, QName};
use crate::term::{RdfTerm, RdfTriple};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

// ============================================================================
// Summary value
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Prefix → namespace URI declared by the source.
    pub prefixes: BTreeMap<String, String>,
    /// Raw triple count.
    pub triples: u64,
    /// Prefix → occurrences across all three positions.
    pub namespaces: BTreeMap<String, u64>,
    pub subjects: RoleStats,
    pub predicates: RoleStats,
    pub objects: ObjectStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStats {
    /// Distinct terms in this position.
    pub count: u64,
    pub namespaces: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStats {
    pub count: u64,
    pub namespaces: BTreeMap<String, u64>,
    pub classes: Partition,
    pub literals: LiteralPartition,
}

/// Occurrence counts keyed by a resolved term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// All occurrences, resolved or not.
    pub count: u64,
    pub namespaces: BTreeMap<String, u64>,
    #[serde(with = "qname_map")]
    pub terms: BTreeMap<QName, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralPartition {
    /// Keyed by effective datatype.
    pub datatypes: Partition,
    /// Raw language tag → occurrences.
    pub languages: BTreeMap<String, u64>,
}

impl Partition {
    pub fn get(&self, prefix: &str, local: &str) -> Option<u64> {
        self.terms.get(&QName::new(prefix, local)).copied()
    }
}

mod qname_map {
    use crate::namespace::QName;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        namespace: String,
        name: String,
        count: u64,
    }

    pub fn serialize<S: Serializer>(map: &BTreeMap<QName, u64>, s: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = map
            .iter()
            .map(|(q, count)| Entry {
                namespace: q.prefix.clone(),
                name: q.local.clone(),
                count: *count,
            })
            .collect();
        entries.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<QName, u64>, D::Error> {
        let entries = Vec::<Entry>::deserialize(d)?;
        Ok(entries
            .into_iter()
            .map(|e| (QName::new(e.namespace, e.name), e.count))
            .collect())
    }
}

// ============================================================================
// Aggregator
// ============================================================================

#[derive(Debug, Default)]
struct RoleCounter {
    distinct: HashSet<RdfTerm>,
    by_namespace: HashMap<String, u64>,
}

impl RoleCounter {
    fn observe(&mut self, term: &RdfTerm, global: &mut HashMap<String, u64>) {
        if !self.distinct.contains(term) {
            self.distinct.insert(term.clone());
        }
        if let Some((namespace, _)) = term.as_iri().and_then(split_iri) {
            bump(&mut self.by_namespace, namespace);
            bump(global, namespace);
        }
    }
}

#[derive(Debug, Default)]
struct PartitionCounter {
    count: u64,
    /// Namespace URI → local name → occurrences.
    terms: HashMap<String, HashMap<String, u64>>,
}

impl PartitionCounter {
    fn observe(&mut self, iri: &str) {
        self.count += 1;
        let Some((namespace, local)) = split_iri(iri) else {
            return;
        };
        match self.terms.get_mut(namespace) {
            Some(locals) => bump(locals, local),
            None => {
                self.terms
                    .insert(namespace.to_string(), HashMap::from([(local.to_string(), 1)]));
            }
        }
    }

    fn finish(self, table: &NamespaceTable, misses: &mut u64) -> Partition {
        let mut partition = Partition {
            count: self.count,
            ..Partition::default()
        };
        for (namespace, locals) in self.terms {
            let Some(prefix) = table.prefix_for(&namespace) else {
                *misses += locals.values().sum::<u64>();
                continue;
            };
            for (local, count) in locals {
                *partition.namespaces.entry(prefix.to_string()).or_default() += count;
                *partition
                    .terms
                    .entry(QName::new(prefix, local))
                    .or_default() += count;
            }
        }
        partition
    }
}

fn bump(map: &mut HashMap<String, u64>, key: &str) {
    if let Some(count) = map.get_mut(key) {
        *count += 1;
    } else {
        map.insert(key.to_string(), 1);
    }
}

fn resolve_counts(
    counts: HashMap<String, u64>,
    table: &NamespaceTable,
    misses: &mut u64,
) -> BTreeMap<String, u64> {
    let mut out = BTreeMap::new();
    for (namespace, count) in counts {
        match table.prefix_for(&namespace) {
            Some(prefix) => *out.entry(prefix.to_string()).or_default() += count,
            None => *misses += count,
        }
    }
    out
}

/// Single-pass statistics over a triple stream.
#[derive(Debug, Default)]
pub struct Summarizer {
    triples: u64,
    namespaces: HashMap<String, u64>,
    subjects: RoleCounter,
    predicates: RoleCounter,
    objects: RoleCounter,
    classes: PartitionCounter,
    literals: PartitionCounter,
    languages: BTreeMap<String, u64>,
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triple: &RdfTriple) {
        self.triples += 1;
        self.subjects.observe(&triple.subject, &mut self.namespaces);
        self.predicates.observe(&triple.predicate, &mut self.namespaces);
        self.objects.observe(&triple.object, &mut self.namespaces);

        match &triple.object {
            RdfTerm::Iri(class) if triple.is_rdf_type() => self.classes.observe(class),
            RdfTerm::Literal(literal) => {
                self.literals.observe(literal.effective_datatype());
                if let Some(language) = &literal.language {
                    *self.languages.entry(language.clone()).or_default() += 1;
                }
            }
            _ => {}
        }
    }

    pub fn triples(&self) -> u64 {
        self.triples
    }

    /// Attach prefixes from `table` and produce the summary.
    pub fn finish(self, table: &NamespaceTable) -> Summary {
        let mut misses = 0u64;
        let summary = Summary {
            prefixes: table.prefixes(),
            triples: self.triples,
            namespaces: resolve_counts(self.namespaces, table, &mut misses),
            subjects: RoleStats {
                count: self.subjects.distinct.len() as u64,
                namespaces: resolve_counts(self.subjects.by_namespace, table, &mut misses),
            },
            predicates: RoleStats {
                count: self.predicates.distinct.len() as u64,
                namespaces: resolve_counts(self.predicates.by_namespace, table, &mut misses),
            },
            objects: ObjectStats {
                count: self.objects.distinct.len() as u64,
                namespaces: resolve_counts(self.objects.by_namespace, table, &mut misses),
                classes: self.classes.finish(table, &mut misses),
                literals: LiteralPartition {
                    datatypes: self.literals.finish(table, &mut misses),
                    languages: self.languages,
                },
            },
        };
        if misses > 0 {
            tracing::debug!(misses, "terms without a namespace binding left out of prefix stats");
        }
        summary
    }
}

/// Summarize an in-memory triple iterator against a known namespace table.
pub fn summarize<'a, I>(triples: I, table: &NamespaceTable) -> Summary
where
    I: IntoIterator<Item = &'a RdfTriple>,
{
    let mut summarizer = Summarizer::new();
    for triple in triples {
        summarizer.push(triple);
    }
    summarizer.finish(table)
}

// ============================================================================
// Dumps
// ============================================================================

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflate gzip input (cached dumps are stored as `<version><ext>.gz`).
fn decompressed<'a>(
    bytes: &'a [u8],
    hint: Option<&str>,
) -> Result<Cow<'a, [u8]>, SummarizeError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|source| SummarizeError::Decompress {
            hint: hint.unwrap_or_default().to_string(),
            source,
        })?;
    tracing::debug!(
        hint = ?hint,
        compressed = bytes.len(),
        inflated = out.len(),
        "inflated gzip dump"
    );
    Ok(Cow::Owned(out))
}

/// Summarize a serialized dump, walking the format fallback chain.
///
/// `hint` is a file name or extension used for the first guess; a trailing
/// `.gz` is ignored there, and gzip input is inflated first. Each attempt
/// starts a fresh [`Summarizer`], so a failed attempt leaves nothing behind.
pub fn summarize_bytes(bytes: &[u8], hint: Option<&str>) -> Result<Summary, SummarizeError> {
    let bytes = decompressed(bytes, hint)?;
    let bytes = bytes.as_ref();
    let mut attempts = Vec::new();
    for format in RdfFormat::fallback_chain(hint) {
        let mut summarizer = Summarizer::new();
        match parse_into(bytes, format, |t| summarizer.push(&t)) {
            Ok(table) => {
                tracing::debug!(
                    format = %format,
                    triples = summarizer.triples(),
                    prefixes = table.len(),
                    "parsed dump"
                );
                return Ok(summarizer.finish(&table));
            }
            Err(message) => {
                tracing::debug!(format = %format, error = %message, "dump parse attempt failed");
                attempts.push((format, message));
            }
        }
    }
    tracing::warn!(hint = ?hint, attempts = attempts.len(), "dump could not be parsed");
    Err(SummarizeError::Parse { attempts })
}

pub fn summarize_file(path: &Path) -> Result<Summary, SummarizeError> {
    let bytes = std::fs::read(path).map_err(|source| SummarizeError::Upstream {
        path: path.display().to_string(),
        source,
    })?;
    let hint = path.file_name().and_then(|n| n.to_str());
    summarize_bytes(&bytes, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{RdfLiteral, RDF_TYPE_IRI, XSD_STRING_IRI};

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> RdfTerm {
        RdfTerm::iri(format!("{EX}{local}"))
    }

    fn table() -> NamespaceTable {
        NamespaceTable::new().with("ex", EX)
    }

    #[test]
    fn language_tagged_objects_are_distinct_and_counted_by_tag() {
        let triples = vec![
            RdfTriple::new(ex("s1"), ex("p"), RdfLiteral::lang("o1", "en")),
            RdfTriple::new(ex("s1"), ex("p"), RdfLiteral::lang("o2", "en")),
        ];
        let summary = summarize(&triples, &table());

        assert_eq!(summary.triples, 2);
        assert_eq!(summary.subjects.count, 1);
        assert_eq!(summary.predicates.count, 1);
        assert_eq!(summary.objects.count, 2);
        assert_eq!(summary.objects.literals.languages.get("en"), Some(&2));
        assert_eq!(summary.objects.literals.datatypes.count, 2);
        assert_eq!(summary.objects.classes.count, 0);
        // s1 twice, p twice; literals never resolve.
        assert_eq!(summary.namespaces.get("ex"), Some(&4));
        assert_eq!(summary.objects.namespaces.get("ex"), None);
    }

    #[test]
    fn rdf_type_object_lands_in_classes() {
        let triples = vec![RdfTriple::new(
            ex("s1"),
            RdfTerm::iri(RDF_TYPE_IRI),
            ex("Foo"),
        )];
        let summary = summarize(&triples, &table());

        let classes = &summary.objects.classes;
        assert_eq!(classes.count, 1);
        assert_eq!(classes.terms.len(), 1);
        assert_eq!(classes.get("ex", "Foo"), Some(1));
        assert_eq!(classes.namespaces.get("ex"), Some(&1));
    }

    #[test]
    fn unresolved_terms_count_in_totals_only() {
        let triples = vec![
            RdfTriple::new(
                RdfTerm::iri("http://unbound.org/s"),
                RdfTerm::iri(RDF_TYPE_IRI),
                RdfTerm::iri("http://unbound.org/C"),
            ),
            RdfTriple::new(RdfTerm::blank("b0"), ex("p"), RdfLiteral::plain("x")),
        ];
        let summary = summarize(&triples, &table());

        assert_eq!(summary.triples, 2);
        assert_eq!(summary.subjects.count, 2);
        assert_eq!(summary.predicates.count, 2);
        assert_eq!(summary.objects.count, 2);
        assert_eq!(summary.subjects.namespaces.len(), 0);
        assert_eq!(summary.predicates.namespaces.get("ex"), Some(&1));
        assert_eq!(summary.namespaces.len(), 1);
        assert_eq!(summary.objects.classes.count, 1);
        assert!(summary.objects.classes.terms.is_empty());
        assert!(summary.objects.classes.namespaces.is_empty());
    }

    #[test]
    fn literal_datatypes_resolve_through_table() {
        let xsd = "http://www.w3.org/2001/XMLSchema#";
        let table = table().with("xsd", xsd);
        let triples = vec![
            RdfTriple::new(ex("a"), ex("p"), RdfLiteral::plain("x")),
            RdfTriple::new(ex("a"), ex("p"), RdfLiteral::typed("1", format!("{xsd}integer"))),
            RdfTriple::new(ex("a"), ex("p"), RdfLiteral::typed("y", XSD_STRING_IRI)),
            RdfTriple::new(ex("a"), ex("p"), RdfLiteral::lang("z", "nl")),
        ];
        let summary = summarize(&triples, &table);

        let literals = &summary.objects.literals;
        assert_eq!(literals.datatypes.count, 4);
        assert_eq!(literals.datatypes.get("xsd", "string"), Some(2));
        assert_eq!(literals.datatypes.get("xsd", "integer"), Some(1));
        assert_eq!(literals.datatypes.get("xsd", "langString"), Some(1));
        assert_eq!(literals.datatypes.namespaces.get("xsd"), Some(&4));
        assert_eq!(literals.languages.get("nl"), Some(&1));
    }

    #[test]
    fn quoted_triples_count_but_never_resolve() {
        let quoted = RdfTerm::Quoted(format!("<< <{EX}s> <{EX}p> <{EX}o> >>"));
        let triples = vec![
            RdfTriple::new(quoted.clone(), ex("certainty"), RdfLiteral::plain("0.9")),
            RdfTriple::new(ex("claim"), ex("about"), quoted),
        ];
        let summary = summarize(&triples, &table());

        assert_eq!(summary.subjects.count, 2);
        assert_eq!(summary.objects.count, 2);
        assert_eq!(summary.subjects.namespaces.get("ex"), Some(&1));
        assert_eq!(summary.objects.namespaces.get("ex"), None);
        assert_eq!(summary.namespaces.get("ex"), Some(&3));
    }

    #[test]
    fn repeated_terms_are_deduplicated() {
        let triples: Vec<RdfTriple> = (0..5)
            .map(|i| RdfTriple::new(ex("s"), ex("p"), ex(&format!("o{}", i % 2))))
            .collect();
        let summary = summarize(&triples, &table());
        assert_eq!(summary.triples, 5);
        assert_eq!(summary.subjects.count, 1);
        assert_eq!(summary.objects.count, 2);
        assert_eq!(summary.subjects.namespaces.get("ex"), Some(&5));
    }

    #[test]
    fn fallback_recovers_turtle_behind_misleading_hint() {
        let turtle = b"@prefix ex: <http://example.org/> .\nex:a a ex:Thing .\n";
        let summary = summarize_bytes(turtle, Some("dump.rdf")).unwrap();
        assert_eq!(summary.triples, 1);
        assert_eq!(summary.objects.classes.get("ex", "Thing"), Some(1));
        assert_eq!(summary.prefixes.get("ex").map(String::as_str), Some(EX));
    }

    #[test]
    fn gzip_dump_is_inflated_before_parsing() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let turtle = b"@prefix ex: <http://example.org/> .\nex:a a ex:Thing .\n";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(turtle).unwrap();
        let gz = encoder.finish().unwrap();

        let summary = summarize_bytes(&gz, Some("2.0.ttl.gz")).unwrap();
        assert_eq!(summary.triples, 1);
        assert_eq!(summary.objects.classes.get("ex", "Thing"), Some(1));
    }

    #[test]
    fn truncated_gzip_is_decompress_error() {
        let err = summarize_bytes(&[0x1f, 0x8b, 0x08], Some("x.ttl.gz")).unwrap_err();
        assert!(matches!(err, SummarizeError::Decompress { .. }), "{err}");
    }

    #[test]
    fn exhausted_fallback_is_parse_error() {
        let err = summarize_bytes(b"@@@ not rdf <<<", Some("x.nt")).unwrap_err();
        match err {
            SummarizeError::Parse { attempts } => {
                let formats: Vec<RdfFormat> = attempts.iter().map(|(f, _)| *f).collect();
                assert_eq!(
                    formats,
                    vec![RdfFormat::NTriples, RdfFormat::RdfXml, RdfFormat::Turtle]
                );
            }
            other => panic!("expected parse error, got {other}"),
        }
    }
}
