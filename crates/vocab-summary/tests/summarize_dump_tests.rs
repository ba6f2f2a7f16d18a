use anyhow::Result;
use std::sync::Arc;
use tempfile::tempdir;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use vocab_record::{
    FileRecordStore, LocationType, MemoryRecordStore, RecordAccessor, StoreConfig, Version,
    VocabularyRecord,
};
use vocab_summary::{
    summarize_bytes, summarize_file, FsDumpCache, Summary, SummaryPipeline,
};

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("in-memory write");
    encoder.finish().expect("in-memory finish")
}

const FOAF_TTL: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .

foaf:Person a owl:Class ;
    rdfs:label "Person"@en , "Persoon"@nl ;
    rdfs:comment "A person." .
foaf:name a owl:DatatypeProperty ;
    rdfs:label "name"@en .
foaf:age rdfs:range xsd:integer ;
    owl:versionInfo "1"^^xsd:integer .
"#;

const FOAF_RDF: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://xmlns.com/foaf/0.1/Person">
    <rdfs:label xml:lang="en">Person</rdfs:label>
  </owl:Class>
</rdf:RDF>"#;

#[test]
fn test_turtle_dump_statistics() -> Result<()> {
    let summary = summarize_bytes(FOAF_TTL.as_bytes(), Some("foaf.ttl"))?;

    assert_eq!(summary.triples, 8);
    assert_eq!(summary.subjects.count, 3);
    assert_eq!(summary.prefixes.len(), 4);

    let classes = &summary.objects.classes;
    assert_eq!(classes.count, 2);
    assert_eq!(classes.get("owl", "Class"), Some(1));
    assert_eq!(classes.get("owl", "DatatypeProperty"), Some(1));

    let literals = &summary.objects.literals;
    assert_eq!(literals.datatypes.count, 5);
    assert_eq!(literals.languages.get("en"), Some(&2));
    assert_eq!(literals.languages.get("nl"), Some(&1));
    assert_eq!(literals.datatypes.get("xsd", "string"), Some(1));
    assert_eq!(literals.datatypes.get("xsd", "integer"), Some(1));
    assert_eq!(literals.datatypes.get("xsd", "langString"), Some(3));
    assert_eq!(literals.datatypes.namespaces.get("xsd"), Some(&5));
    assert_eq!(summary.subjects.namespaces.get("foaf"), Some(&8));
    Ok(())
}

#[test]
fn test_rdfxml_dump_statistics() -> Result<()> {
    let summary = summarize_bytes(FOAF_RDF.as_bytes(), Some("foaf.rdf"))?;

    assert_eq!(summary.triples, 2);
    assert_eq!(summary.objects.classes.get("owl", "Class"), Some(1));
    assert_eq!(summary.predicates.namespaces.get("rdf"), Some(&1));
    assert_eq!(summary.predicates.namespaces.get("rdfs"), Some(&1));
    // foaf is never declared in this document.
    assert!(summary.subjects.namespaces.is_empty());
    Ok(())
}

#[test]
fn test_unknown_extension_falls_back_to_turtle() -> Result<()> {
    let summary = summarize_bytes(FOAF_TTL.as_bytes(), Some("foaf.data"))?;
    assert_eq!(summary.triples, 8);
    Ok(())
}

#[test]
fn test_summarize_missing_file_is_upstream_error() {
    let dir = tempdir().unwrap();
    let err = summarize_file(&dir.path().join("absent.ttl")).unwrap_err();
    assert!(matches!(err, vocab_summary::SummarizeError::Upstream { .. }));
}

#[test]
fn test_pipeline_writes_cached_versions_and_skips_the_rest() -> Result<()> {
    let dir = tempdir()?;
    let config = StoreConfig {
        root_path: dir.path().to_path_buf(),
        ..StoreConfig::default()
    };
    let accessor = RecordAccessor::new(Arc::new(FileRecordStore::from_config(&config)));

    let mut record = VocabularyRecord::new("foaf", "Friend of a Friend");
    record.versions = vec![
        Version::new("0.1").with_valid_from("2005-01-01"),
        Version::new("0.99").with_valid_from("2014-01-14"),
    ];
    accessor.persist("foaf", &record)?;

    let cache_dir = config.cache_dir().join("foaf");
    std::fs::create_dir_all(&cache_dir)?;
    std::fs::write(cache_dir.join("0.99.ttl"), FOAF_TTL)?;

    let pipeline = SummaryPipeline::new(
        accessor.clone(),
        Arc::new(FsDumpCache::from_config(&config)),
    );
    let report = pipeline.run("foaf")?;
    assert_eq!(report.written_versions(), vec!["0.99"]);
    assert_eq!(report.written[0].source, None);
    assert_eq!(report.written[0].triples, 8);
    assert_eq!(report.skipped, vec!["0.1".to_string()]);

    let loaded = accessor.load("foaf")?;
    let written = loaded.version("0.99").and_then(|v| v.summary.as_ref());
    let summary = Summary::from_document(written.expect("summary written"));
    assert_eq!(summary, summarize_file(&cache_dir.join("0.99.ttl"))?);
    assert!(loaded.version("0.1").and_then(|v| v.summary.as_ref()).is_none());
    Ok(())
}

#[test]
fn test_pipeline_on_record_without_versions() -> Result<()> {
    let store = Arc::new(MemoryRecordStore::new());
    let accessor = RecordAccessor::new(store.clone());
    accessor.persist("empty", &VocabularyRecord::new("empty", "Empty"))?;

    let dir = tempdir()?;
    let pipeline = SummaryPipeline::new(accessor, Arc::new(FsDumpCache::new(dir.path())));
    let report = pipeline.run("empty")?;
    assert!(report.written.is_empty());
    assert!(report.skipped.is_empty());
    Ok(())
}

#[test]
fn test_pipeline_reads_gzipped_cache_and_reports_source() -> Result<()> {
    let dir = tempdir()?;
    let config = StoreConfig {
        root_path: dir.path().to_path_buf(),
        ..StoreConfig::default()
    };
    let accessor = RecordAccessor::new(Arc::new(FileRecordStore::from_config(&config)));

    let mut record = VocabularyRecord::new("as", "Activity Streams");
    record.versions = vec![Version::new("2.0")];
    accessor.persist("as", &record)?;
    accessor.upsert_location(
        "as",
        "2.0",
        "https://cache.example/as/2.0.ttl",
        LocationType::Endpoint,
        Some("cache"),
    )?;
    accessor.upsert_location(
        "as",
        "2.0",
        "https://www.w3.org/ns/activitystreams-owl.ttl",
        LocationType::Endpoint,
        None,
    )?;

    let cache_dir = config.cache_dir().join("as");
    std::fs::create_dir_all(&cache_dir)?;
    std::fs::write(cache_dir.join("2.0.ttl.gz"), gzip(FOAF_TTL.as_bytes()))?;

    let pipeline = SummaryPipeline::new(
        accessor.clone(),
        Arc::new(FsDumpCache::from_config(&config)),
    );
    let report = pipeline.run("as")?;
    assert_eq!(report.written_versions(), vec!["2.0"]);
    assert_eq!(
        report.written[0].source.as_deref(),
        Some("https://www.w3.org/ns/activitystreams-owl.ttl")
    );

    let loaded = accessor.load("as")?;
    let doc = loaded.version("2.0").and_then(|v| v.summary.as_ref());
    let summary = Summary::from_document(doc.expect("summary written"));
    assert_eq!(summary, summarize_bytes(FOAF_TTL.as_bytes(), Some("2.0.ttl"))?);
    Ok(())
}
