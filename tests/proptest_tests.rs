// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that the aggregation pipeline
//! handles arbitrary keys, values and source orders correctly.

use cfghub::adapters::{CastingPreprocessor, RecursiveStrategy, StandardPreprocessor};
use cfghub::domain::{ConfigKey, ConfigMap, ConfigStore, ConfigValue};
use cfghub::ports::{MergeStrategy, Preprocessor};
use cfghub::service::ConfigHub;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn sources() -> impl Strategy<Value = Vec<Vec<(String, i64)>>> {
    prop::collection::vec(
        prop::collection::vec(("[a-e]", prop::num::i64::ANY), 1..5),
        1..6,
    )
}

fn to_map(pairs: &[(String, i64)]) -> ConfigMap {
    pairs
        .iter()
        .map(|(k, v)| (k.clone(), ConfigValue::from(*v)))
        .collect()
}

// Test that the store length equals the number of distinct keys
proptest! {
    #[test]
    fn test_length_equals_distinct_keys(batches in sources()) {
        let maps: Vec<ConfigMap> = batches.iter().map(|b| to_map(b)).collect();
        let store = ConfigHub::new().aggregate(maps).unwrap();

        let distinct: HashSet<&String> = batches.iter().flatten().map(|(k, _)| k).collect();
        prop_assert_eq!(store.len(), distinct.len());
        prop_assert_eq!(store.iter().count(), store.len());
    }
}

// Test that the flat strategy keeps the last written value
proptest! {
    #[test]
    fn test_flat_last_writer_wins(batches in sources()) {
        let maps: Vec<ConfigMap> = batches.iter().map(|b| to_map(b)).collect();
        let store = ConfigHub::new().aggregate(maps).unwrap();

        let mut expected: HashMap<&String, i64> = HashMap::new();
        for (k, v) in batches.iter().flatten() {
            expected.insert(k, *v);
        }
        for (k, v) in expected {
            prop_assert_eq!(store.get(k).unwrap(), Some(&ConfigValue::from(v)));
        }
    }
}

// Test that provenance points to the most recent source carrying a key
proptest! {
    #[test]
    fn test_provenance_most_recent_wins(batches in sources()) {
        let maps: Vec<ConfigMap> = batches.iter().map(|b| to_map(b)).collect();
        let store = ConfigHub::new().aggregate(maps.clone()).unwrap();
        prop_assert_eq!(store.applied_confs().len(), maps.len());

        for key in store.keys() {
            let last = maps.iter().rposition(|m| m.contains_key(key.as_str())).unwrap();
            let record = store.applied_from(key.as_str()).unwrap();
            prop_assert_eq!(record.payload.as_ref(), &maps[last]);
        }
    }
}

// Test that recursive merge of disjoint mappings is their union
proptest! {
    #[test]
    fn test_recursive_disjoint_union(
        left in prop::collection::btree_map("[a-e]", prop::num::i64::ANY, 0..5),
        right in prop::collection::btree_map("[f-j]", prop::num::i64::ANY, 0..5)
    ) {
        let target: ConfigMap = left.iter().map(|(k, v)| (k.clone(), ConfigValue::from(*v))).collect();
        let incoming: ConfigMap = right.iter().map(|(k, v)| (k.clone(), ConfigValue::from(*v))).collect();

        let merged = RecursiveStrategy::new().merge("K", Some(target.into()), incoming.into(), false);
        let merged = merged.as_mapping().unwrap();

        prop_assert_eq!(merged.len(), left.len() + right.len());
        for (k, v) in left.iter().chain(right.iter()) {
            prop_assert_eq!(&merged[k.as_str()], &ConfigValue::from(*v));
        }
    }
}

// Test that standard keys only contain upper snake case characters
proptest! {
    #[test]
    fn test_standard_key_charset(s in "\\PC*") {
        let key = StandardPreprocessor::new().process_key(&s);
        prop_assert!(key.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
    }
}

// Test that standard key normalization is idempotent
proptest! {
    #[test]
    fn test_standard_key_idempotent(s in "\\PC*") {
        let preprocessor = StandardPreprocessor::new();
        let once = preprocessor.process_key(&s);
        prop_assert_eq!(preprocessor.process_key(&once), once);
    }
}

// Test that normalized keys are found regardless of spelling
proptest! {
    #[test]
    fn test_lookup_through_preprocessor(parts in prop::collection::vec("[a-z]+", 1..4)) {
        let mut store = ConfigStore::builder()
            .preprocessor(StandardPreprocessor::new())
            .build()
            .unwrap();
        store.set(&parts.join("."), 1).unwrap();

        prop_assert_eq!(store.get(&parts.join(" ")).unwrap(), Some(&ConfigValue::from(1)));
        prop_assert_eq!(store.get(&parts.join("-").to_uppercase()).unwrap(), Some(&ConfigValue::from(1)));
    }
}

// Test that decimal integers are cast to integers
proptest! {
    #[test]
    fn test_casting_integers(n in prop::num::i64::ANY) {
        prop_assert_eq!(CastingPreprocessor::cast(&n.to_string()), Some(ConfigValue::Integer(n)));
    }
}

// Test that decimals with one dot are cast to floats
proptest! {
    #[test]
    fn test_casting_floats(whole in 0u32..100_000, frac in 0u32..1000) {
        let text = format!("{}.{}", whole, frac);
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(CastingPreprocessor::cast(&text), Some(ConfigValue::Float(expected)));
    }
}

// Test that casting never touches strings starting with a letter outside the token tables
proptest! {
    #[test]
    fn test_casting_leaves_words(s in "[g-mq-su-x][a-z]{3,10}") {
        let (_, value) = CastingPreprocessor::new().process("K", ConfigValue::from(s.clone()));
        prop_assert_eq!(value, ConfigValue::from(s));
    }
}

// Test that ConfigKey can be created from any string
proptest! {
    #[test]
    fn test_config_key_from_any_string(s in "\\PC*") {
        let key = ConfigKey::from(s.clone());
        prop_assert_eq!(key.as_str(), s.as_str());
    }
}

// Test unicode handling
proptest! {
    #[test]
    fn test_unicode_values(s in "\\p{Greek}+|\\p{Cyrillic}+|\\p{Han}+") {
        let store = ConfigStore::from_source(
            [("K".to_string(), ConfigValue::from(s.clone()))].into_iter().collect::<ConfigMap>()
        ).unwrap();
        prop_assert_eq!(store.get("K").unwrap().and_then(ConfigValue::as_str), Some(s.as_str()));
    }
}
