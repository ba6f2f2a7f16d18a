//! Namespace table and term resolution into `(prefix, local-name)` pairs.
//!
//! Resolution never fails loudly: an IRI whose namespace is not in the table,
//! a blank node, a literal or a quoted triple all resolve to `None`.

use crate::term::RdfTerm;
use std::collections::BTreeMap;

/// A `prefix:local` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub prefix: String,
    pub local: String,
}

impl QName {
    pub fn new(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            local: local.into(),
        }
    }
}

/// Namespace URI → prefix, derived from the bindings a source graph declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    by_namespace: BTreeMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`. If the namespace is already bound, the
    /// lexicographically smallest prefix is kept.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.by_namespace.get_mut(&namespace) {
            Some(existing) if *existing <= prefix => {}
            Some(existing) => *existing = prefix,
            None => {
                self.by_namespace.insert(namespace, prefix);
            }
        }
    }

    pub fn with(mut self, prefix: &str, namespace: &str) -> Self {
        self.bind(prefix, namespace);
        self
    }

    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.by_namespace.get(namespace).map(String::as_str)
    }

    /// Prefix → namespace URI, sorted by prefix.
    pub fn prefixes(&self) -> BTreeMap<String, String> {
        self.by_namespace
            .iter()
            .map(|(ns, prefix)| (prefix.clone(), ns.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_namespace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_namespace.is_empty()
    }

    pub fn resolve_iri(&self, iri: &str) -> Option<QName> {
        let (namespace, local) = split_iri(iri)?;
        let prefix = self.prefix_for(namespace)?;
        Some(QName::new(prefix, local))
    }

    pub fn resolve(&self, term: &RdfTerm) -> Option<QName> {
        term.as_iri().and_then(|iri| self.resolve_iri(iri))
    }
}

/// Split after the last `#`, `/` or `:`; `None` when the local name would be empty.
pub fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let cut = iri.rfind(['#', '/', ':'])? + 1;
    let (namespace, local) = iri.split_at(cut);
    if local.is_empty() {
        None
    } else {
        Some((namespace, local))
    }
}
