//! Typed in-memory model of a vocabulary record document.
//!
//! A record is loaded fresh for every operation; nothing here is shared
//! between workers. Field names follow the persisted JSON document
//! (`validFrom`, `landingPage`, location `type`).

use crate::summary::SummaryDoc;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Record
// ============================================================================

/// The persisted document describing one vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
    /// Record-level locations (not tied to a version).
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Registries that reference this vocabulary.
    #[serde(default)]
    pub registries: Vec<Registry>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl VocabularyRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            license: None,
            namespace: None,
            locations: Vec::new(),
            registries: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Versions in registry order; see [`version_order`].
    pub fn ordered_versions(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self.versions.iter().collect();
        versions.sort_by(|a, b| version_order(a, b));
        versions
    }

    pub fn version(&self, label: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == label)
    }

    pub fn version_mut(&mut self, label: &str) -> Option<&mut Version> {
        self.versions.iter_mut().find(|v| v.version == label)
    }
}

/// Ordering used when listing versions: descending on
/// `(has valid-from, version label)`.
///
/// The label comparison is plain lexicographic, so `"9.0"` sorts before
/// `"10.0"`; this is not semantic-version ordering. The sort is stable:
/// equal keys keep document order.
pub fn version_order(a: &Version, b: &Version) -> Ordering {
    let key_a = (a.valid_from.is_some(), a.version.as_str());
    let key_b = (b.valid_from.is_some(), b.version.as_str());
    key_b.cmp(&key_a)
}

// ============================================================================
// Version
// ============================================================================

/// A labeled release of a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// Insertion order, never sorted.
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryDoc>,
}

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            valid_from: None,
            locations: Vec::new(),
            summary: None,
        }
    }

    pub fn with_valid_from(mut self, valid_from: impl Into<String>) -> Self {
        self.valid_from = Some(valid_from.into());
        self
    }

    /// First location of the given type and recipe.
    pub fn location(&self, kind: LocationType, recipe: Option<&str>) -> Option<&Location> {
        self.locations.iter().find(|l| l.matches(kind, recipe))
    }

    /// Remove every location with the same `(type, recipe)` and append `location`.
    ///
    /// Returns how many prior locations were replaced.
    pub fn upsert_location(&mut self, location: Location) -> usize {
        let before = self.locations.len();
        self.locations
            .retain(|l| !l.matches(location.kind, location.recipe.as_deref()));
        let removed = before - self.locations.len();
        self.locations.push(location);
        removed
    }
}

// ============================================================================
// Location
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Homepage,
    Endpoint,
    Dump,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Homepage => "homepage",
            Self::Endpoint => "endpoint",
            Self::Dump => "dump",
        })
    }
}

/// An access point for a version's data.
///
/// `recipe` tags how the location was produced (`"cache"`, `"sparql"`, ...).
/// `None` is the primary location and is a different identity from `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
}

impl Location {
    pub fn new(uri: impl Into<String>, kind: LocationType, recipe: Option<&str>) -> Self {
        Self {
            uri: uri.into(),
            kind,
            recipe: recipe.map(str::to_string),
        }
    }

    pub fn matches(&self, kind: LocationType, recipe: Option<&str>) -> bool {
        self.kind == kind && self.recipe.as_deref() == recipe
    }
}

// ============================================================================
// Record-level metadata
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// A third-party directory that lists the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
}
