use proptest::prelude::*;
use std::sync::Arc;
use vocab_record::{
    LocationType, MemoryRecordStore, RecordAccessor, Version, VocabularyRecord,
};

fn label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9a-z.]{0,6}").unwrap()
}

fn version() -> impl Strategy<Value = Version> {
    (label(), proptest::option::of(label())).prop_map(|(label, valid_from)| Version {
        valid_from,
        ..Version::new(label)
    })
}

fn location_type() -> impl Strategy<Value = LocationType> {
    prop_oneof![
        Just(LocationType::Homepage),
        Just(LocationType::Endpoint),
        Just(LocationType::Dump),
    ]
}

fn recipe() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("cache".to_string())),
        Just(Some("sparql".to_string())),
    ]
}

fn accessor_with(record: &VocabularyRecord) -> RecordAccessor {
    let store = Arc::new(MemoryRecordStore::new());
    store.insert_raw(&record.id, serde_json::to_vec(record).unwrap());
    RecordAccessor::new(store)
}

proptest! {
    #[test]
    fn ordered_versions_respect_valid_from_then_label(versions in proptest::collection::vec(version(), 0..12)) {
        let mut record = VocabularyRecord::new("v", "V");
        record.versions = versions;
        let ordered = record.ordered_versions();

        for pair in ordered.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(a.valid_from.is_some() >= b.valid_from.is_some());
            if a.valid_from.is_some() == b.valid_from.is_some() {
                prop_assert!(a.version >= b.version);
            }
        }
        prop_assert_eq!(ordered.len(), record.versions.len());
    }

    #[test]
    fn iterated_versions_match_ordered_versions(versions in proptest::collection::vec(version(), 0..8)) {
        let mut record = VocabularyRecord::new("v", "V");
        record.versions = versions;
        let accessor = accessor_with(&record);

        let expected: Vec<Version> = record.ordered_versions().into_iter().cloned().collect();
        let iterated: Vec<Version> = accessor.versions("v").start().unwrap().map(|(_, v)| v).collect();
        prop_assert_eq!(iterated, expected);
    }

    #[test]
    fn repeated_upsert_leaves_one_match(
        kind in location_type(),
        recipe in recipe(),
        uri in "http://[a-z]{1,8}\\.org/[a-z]{0,6}",
        repeats in 1usize..4,
    ) {
        let mut record = VocabularyRecord::new("v", "V");
        record.versions = vec![Version::new("1.0")];
        let accessor = accessor_with(&record);

        for _ in 0..repeats {
            accessor
                .upsert_location("v", "1.0", &uri, kind, recipe.as_deref())
                .unwrap();
        }

        let record = accessor.load("v").unwrap();
        let matching = record.versions[0]
            .locations
            .iter()
            .filter(|l| l.matches(kind, recipe.as_deref()))
            .count();
        prop_assert_eq!(matching, 1);
        prop_assert_eq!(record.versions[0].locations.len(), 1);
    }

    #[test]
    fn distinct_recipes_coexist(kind in location_type(), a in recipe(), b in recipe()) {
        prop_assume!(a != b);
        let mut record = VocabularyRecord::new("v", "V");
        record.versions = vec![Version::new("1.0")];
        let accessor = accessor_with(&record);

        accessor.upsert_location("v", "1.0", "http://a", kind, a.as_deref()).unwrap();
        accessor.upsert_location("v", "1.0", "http://b", kind, b.as_deref()).unwrap();

        let record = accessor.load("v").unwrap();
        prop_assert_eq!(record.versions[0].locations.len(), 2);
    }
}
