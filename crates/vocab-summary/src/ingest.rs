//! RDF dump ingestion.
//!
//! Parses N-Triples, Turtle, N-Quads, TriG and RDF/XML with `rio`, streaming
//! every statement into a caller-provided sink, and collects the namespace
//! bindings the document declares:
//!
//! - Turtle / TriG: `@prefix` / `PREFIX` declarations (from the parser).
//! - RDF/XML: `xmlns:` attributes (scanned with `quick-xml`).
//! - N-Triples / N-Quads: none.
//!
//! Named graphs are ignored; quads contribute their triple.

use crate::namespace::NamespaceTable;
use crate::term::{RdfLiteral, RdfTerm, RdfTriple};
use quick_xml::events::Event;
use rio_api::model::{Literal, NamedNode, Subject, Term};
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsParser, NTriplesParser, TriGParser, TurtleError, TurtleParser};
use rio_xml::{RdfXmlError, RdfXmlParser};
use std::fmt;
use std::io::BufReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    /// Generic format tried after the guess.
    pub const GENERIC: RdfFormat = RdfFormat::RdfXml;
    /// Alternate format tried last.
    pub const ALTERNATE: RdfFormat = RdfFormat::Turtle;

    /// Guess from a file name or extension (`"2.0.ttl"`, `"ttl"`, `"x.rdf.gz"`).
    pub fn guess(hint: &str) -> Option<Self> {
        let lower = hint.to_lowercase();
        let trimmed = lower.strip_suffix(".gz").unwrap_or(&lower);
        let ext = trimmed.rsplit('.').next().unwrap_or(trimmed);
        match ext {
            "nt" | "ntriples" => Some(Self::NTriples),
            "ttl" | "turtle" | "n3" => Some(Self::Turtle),
            "nq" | "nquads" => Some(Self::NQuads),
            "trig" => Some(Self::TriG),
            "rdf" | "owl" | "rdfs" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    /// Formats to try, in order, without repeats.
    pub fn fallback_chain(hint: Option<&str>) -> Vec<Self> {
        let mut chain = Vec::with_capacity(3);
        let guessed = hint.and_then(Self::guess);
        for format in guessed.into_iter().chain([Self::GENERIC, Self::ALTERNATE]) {
            if !chain.contains(&format) {
                chain.push(format);
            }
        }
        chain
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NTriples => "ntriples",
            Self::Turtle => "turtle",
            Self::NQuads => "nquads",
            Self::TriG => "trig",
            Self::RdfXml => "rdfxml",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Term conversion
// ============================================================================

fn named(node: NamedNode<'_>) -> RdfTerm {
    RdfTerm::Iri(node.iri.to_string())
}

fn subject_term(subject: Subject<'_>) -> RdfTerm {
    match subject {
        Subject::NamedNode(node) => named(node),
        Subject::BlankNode(node) => RdfTerm::BlankNode(node.id.to_string()),
        other => RdfTerm::Quoted(other.to_string()),
    }
}

fn object_term(term: Term<'_>) -> RdfTerm {
    match term {
        Term::NamedNode(node) => named(node),
        Term::BlankNode(node) => RdfTerm::BlankNode(node.id.to_string()),
        Term::Literal(literal) => RdfTerm::Literal(literal_of(literal)),
        other => RdfTerm::Quoted(other.to_string()),
    }
}

fn literal_of(literal: Literal<'_>) -> RdfLiteral {
    match literal {
        Literal::Simple { value } => RdfLiteral::plain(value),
        Literal::LanguageTaggedString { value, language } => RdfLiteral::lang(value, language),
        Literal::Typed { value, datatype } => RdfLiteral::typed(value, datatype.iri),
    }
}

fn triple_of(subject: Subject<'_>, predicate: NamedNode<'_>, object: Term<'_>) -> RdfTriple {
    RdfTriple {
        subject: subject_term(subject),
        predicate: named(predicate),
        object: object_term(object),
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse `bytes` as `format`, handing every triple to `sink`.
///
/// Returns the declared namespace bindings. On error the sink may already have
/// seen some triples; callers that retry must discard whatever it accumulated.
pub fn parse_into<F>(bytes: &[u8], format: RdfFormat, mut sink: F) -> Result<NamespaceTable, String>
where
    F: FnMut(RdfTriple),
{
    let reader = BufReader::new(bytes);
    let mut table = NamespaceTable::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = NTriplesParser::new(reader);
            parser
                .parse_all(&mut |t| -> Result<(), TurtleError> {
                    sink(triple_of(t.subject, t.predicate, t.object));
                    Ok(())
                })
                .map_err(|e| format!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::Turtle => {
            let mut parser = TurtleParser::new(reader, None);
            parser
                .parse_all(&mut |t| -> Result<(), TurtleError> {
                    sink(triple_of(t.subject, t.predicate, t.object));
                    Ok(())
                })
                .map_err(|e| format!("failed to parse Turtle: {e}"))?;
            for (prefix, namespace) in parser.prefixes() {
                table.bind(prefix.as_str(), namespace.as_str());
            }
        }
        RdfFormat::NQuads => {
            let mut parser = NQuadsParser::new(reader);
            parser
                .parse_all(&mut |q| -> Result<(), TurtleError> {
                    sink(triple_of(q.subject, q.predicate, q.object));
                    Ok(())
                })
                .map_err(|e| format!("failed to parse N-Quads: {e}"))?;
        }
        RdfFormat::TriG => {
            let mut parser = TriGParser::new(reader, None);
            parser
                .parse_all(&mut |q| -> Result<(), TurtleError> {
                    sink(triple_of(q.subject, q.predicate, q.object));
                    Ok(())
                })
                .map_err(|e| format!("failed to parse TriG: {e}"))?;
            for (prefix, namespace) in parser.prefixes() {
                table.bind(prefix.as_str(), namespace.as_str());
            }
        }
        RdfFormat::RdfXml => {
            let mut parser = RdfXmlParser::new(reader, None);
            parser
                .parse_all(&mut |t| -> Result<(), RdfXmlError> {
                    sink(triple_of(t.subject, t.predicate, t.object));
                    Ok(())
                })
                .map_err(|e| format!("failed to parse RDF/XML: {e}"))?;
            xml_namespaces(bytes, &mut table)?;
        }
    }

    Ok(table)
}

/// Collect `xmlns:prefix="uri"` (and default `xmlns`) declarations.
fn xml_namespaces(bytes: &[u8], table: &mut NamespaceTable) -> Result<(), String> {
    let mut reader = quick_xml::Reader::from_reader(bytes);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes().flatten() {
                    let key = attr.key.as_ref();
                    let prefix = if key == b"xmlns" {
                        ""
                    } else if let Some(p) = key.strip_prefix(&b"xmlns:"[..]) {
                        std::str::from_utf8(p).map_err(|e| e.to_string())?
                    } else {
                        continue;
                    };
                    let namespace = attr.unescape_value().map_err(|e| e.to_string())?;
                    if !namespace.is_empty() {
                        table.bind(prefix, namespace.into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("failed to read RDF/XML namespaces: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
