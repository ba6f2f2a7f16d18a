//! Summary Writer: merge a [`Summary`] into one version of a record.
//!
//! The subtree is built completely before it replaces the version's previous
//! summary, so an error while building can never leave a half-written summary.
//! All lists come out of `BTreeMap`s, which makes the output deterministic.

use crate::engine::{LiteralPartition, ObjectStats, Partition, RoleStats, Summary};
use crate::namespace::QName;
use std::collections::BTreeMap;
use vocab_record::{
    LevelDoc, LiteralsDoc, NameCount, NamespaceCount, ObjectsDoc, PartitionDoc, RecordAccessor,
    RecordError, StatementsDoc, SummaryDoc, UpdateOutcome,
};

impl Summary {
    /// Build the persisted subtree.
    pub fn to_document(&self) -> SummaryDoc {
        let namespaces = self
            .prefixes
            .iter()
            .map(|(prefix, uri)| NamespaceCount {
                uri: uri.clone(),
                prefix: prefix.clone(),
                count: self.namespaces.get(prefix).copied().unwrap_or(0),
            })
            .collect();

        SummaryDoc {
            namespaces,
            statements: StatementsDoc {
                count: self.triples,
                subjects: self.level(&self.subjects),
                predicates: self.level(&self.predicates),
                objects: ObjectsDoc {
                    count: self.objects.count,
                    namespaces: self.namespace_counts(&self.objects.namespaces),
                    classes: self.partition(&self.objects.classes),
                    literals: self.literals(&self.objects.literals),
                },
            },
        }
    }

    /// Rebuild a summary from its persisted subtree.
    ///
    /// Inverse of [`to_document`](Self::to_document): prefixes come from the
    /// top-level namespace list, zero counts are not carried into the maps.
    pub fn from_document(doc: &SummaryDoc) -> Self {
        let prefixes = doc
            .namespaces
            .iter()
            .map(|ns| (ns.prefix.clone(), ns.uri.clone()))
            .collect();
        let objects = &doc.statements.objects;

        Summary {
            prefixes,
            triples: doc.statements.count,
            namespaces: counts_of(&doc.namespaces),
            subjects: role_of(&doc.statements.subjects),
            predicates: role_of(&doc.statements.predicates),
            objects: ObjectStats {
                count: objects.count,
                namespaces: counts_of(&objects.namespaces),
                classes: Partition {
                    count: objects.classes.count,
                    namespaces: counts_of(&objects.classes.namespaces),
                    terms: terms_of(&objects.classes.list),
                },
                literals: LiteralPartition {
                    datatypes: Partition {
                        count: objects.literals.count,
                        namespaces: counts_of(&objects.literals.namespaces),
                        terms: terms_of(&objects.literals.list),
                    },
                    languages: objects.literals.languages.clone(),
                },
            },
        }
    }

    fn namespace_counts(&self, counts: &BTreeMap<String, u64>) -> Vec<NamespaceCount> {
        counts
            .iter()
            .map(|(prefix, count)| NamespaceCount {
                uri: self.prefixes.get(prefix).cloned().unwrap_or_default(),
                prefix: prefix.clone(),
                count: *count,
            })
            .collect()
    }

    fn level(&self, role: &RoleStats) -> LevelDoc {
        LevelDoc {
            count: role.count,
            namespaces: self.namespace_counts(&role.namespaces),
        }
    }

    fn partition(&self, partition: &Partition) -> PartitionDoc {
        PartitionDoc {
            count: partition.count,
            namespaces: self.namespace_counts(&partition.namespaces),
            list: name_counts(&partition.terms),
        }
    }

    fn literals(&self, literals: &LiteralPartition) -> LiteralsDoc {
        LiteralsDoc {
            count: literals.datatypes.count,
            namespaces: self.namespace_counts(&literals.datatypes.namespaces),
            list: name_counts(&literals.datatypes.terms),
            languages: literals.languages.clone(),
        }
    }
}

fn name_counts(terms: &BTreeMap<QName, u64>) -> Vec<NameCount> {
    terms
        .iter()
        .map(|(q, count)| NameCount {
            namespace: q.prefix.clone(),
            name: q.local.clone(),
            count: *count,
        })
        .collect()
}

fn counts_of(list: &[NamespaceCount]) -> BTreeMap<String, u64> {
    list.iter()
        .filter(|ns| ns.count > 0)
        .map(|ns| (ns.prefix.clone(), ns.count))
        .collect()
}

fn role_of(level: &LevelDoc) -> RoleStats {
    RoleStats {
        count: level.count,
        namespaces: counts_of(&level.namespaces),
    }
}

fn terms_of(list: &[NameCount]) -> BTreeMap<QName, u64> {
    list.iter()
        .map(|nc| (QName::new(nc.namespace.clone(), nc.name.clone()), nc.count))
        .collect()
}

/// Replace `version`'s summary subtree with `summary` and persist.
pub fn write_summary(
    accessor: &RecordAccessor,
    id: &str,
    version: &str,
    summary: &Summary,
) -> Result<UpdateOutcome, RecordError> {
    let doc = summary.to_document();
    accessor.update(id, move |record| {
        let Some(target) = record.version_mut(version) else {
            tracing::info!(id = %id, version = %version, "version not found; summary not written");
            return UpdateOutcome::VersionMissing;
        };
        target.summary = Some(doc);
        tracing::debug!(
            id = %id,
            version = %version,
            triples = summary.triples,
            "wrote summary"
        );
        UpdateOutcome::Written
    })
}
