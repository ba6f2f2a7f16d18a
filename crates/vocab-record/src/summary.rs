//! Persisted shape of a version's summary subtree.
//!
//! Downstream consumers read these paths directly:
//!
//! ```text
//! summary
//! ├── namespaces[]            {uri, prefix, count}
//! └── statements
//!     ├── count               triples
//!     ├── subjects            {count, namespaces[]}
//!     ├── predicates          {count, namespaces[]}
//!     └── objects             {count, namespaces[]}
//!         ├── classes         {count, namespaces[], list[] {namespace, name, count}}
//!         └── literals        {count, namespaces[], list[], languages {tag: count}}
//! ```
//!
//! Lists are written in a fixed order (by prefix, then name) so rewriting the
//! same summary yields byte-identical documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDoc {
    /// Every namespace the source declared, with its occurrence count (may be 0).
    #[serde(default)]
    pub namespaces: Vec<NamespaceCount>,
    pub statements: StatementsDoc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementsDoc {
    pub count: u64,
    pub subjects: LevelDoc,
    pub predicates: LevelDoc,
    pub objects: ObjectsDoc,
}

/// Distinct-term count for one triple position plus its namespace usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDoc {
    pub count: u64,
    #[serde(default)]
    pub namespaces: Vec<NamespaceCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectsDoc {
    pub count: u64,
    #[serde(default)]
    pub namespaces: Vec<NamespaceCount>,
    pub classes: PartitionDoc,
    pub literals: LiteralsDoc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDoc {
    pub count: u64,
    #[serde(default)]
    pub namespaces: Vec<NamespaceCount>,
    #[serde(default)]
    pub list: Vec<NameCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralsDoc {
    pub count: u64,
    #[serde(default)]
    pub namespaces: Vec<NamespaceCount>,
    #[serde(default)]
    pub list: Vec<NameCount>,
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceCount {
    pub uri: String,
    pub prefix: String,
    pub count: u64,
}

/// One partition key: `namespace` is the prefix, `name` the local name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
    pub namespace: String,
    pub name: String,
    pub count: u64,
}
