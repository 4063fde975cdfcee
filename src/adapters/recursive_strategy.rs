// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recursive merge strategy.
//!
//! Mappings are merged key by key, typed objects field by field, and sequences are
//! either replaced or concatenated. Primitives and mismatched shapes are replaced.

use crate::domain::{ConfigMap, ConfigValue};
use crate::ports::MergeStrategy;

/// Merges nested values structurally.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::RecursiveStrategy;
/// use cfghub::domain::{ConfigMap, ConfigValue};
/// use cfghub::ports::MergeStrategy;
///
/// let mut base = ConfigMap::new();
/// base.insert("host".into(), "localhost".into());
/// base.insert("port".into(), 8080.into());
///
/// let mut overlay = ConfigMap::new();
/// overlay.insert("port".into(), 9000.into());
///
/// let merged = RecursiveStrategy::new().merge("SERVER", Some(base.into()), overlay.into(), false);
/// let merged = merged.as_mapping().unwrap();
/// assert_eq!(merged["host"], "localhost");
/// assert_eq!(merged["port"], 9000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveStrategy {
    merge_sequences: bool,
}

impl RecursiveStrategy {
    /// Creates a strategy that replaces sequences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether sequences are concatenated instead of replaced.
    pub fn merge_sequences(mut self, enabled: bool) -> Self {
        self.merge_sequences = enabled;
        self
    }

    /// Returns whether sequences are concatenated.
    pub fn merges_sequences(&self) -> bool {
        self.merge_sequences
    }

    fn merge_values(&self, target: ConfigValue, incoming: ConfigValue) -> ConfigValue {
        match (target, incoming) {
            (_, ConfigValue::Null) => ConfigValue::Null,
            (target, incoming) if target.is_primitive() || incoming.is_primitive() => incoming,
            (ConfigValue::Sequence(mut target), ConfigValue::Sequence(incoming)) => {
                if self.merge_sequences {
                    target.extend(incoming);
                    ConfigValue::Sequence(target)
                } else {
                    ConfigValue::Sequence(incoming)
                }
            }
            (ConfigValue::Mapping(mut target), ConfigValue::Mapping(incoming)) => {
                for (key, value) in incoming {
                    match target.get_mut(&key) {
                        Some(slot) => {
                            let current = std::mem::take(slot);
                            *slot = self.merge_values(current, value);
                        }
                        None => {
                            target.insert(key, value);
                        }
                    }
                }
                ConfigValue::Mapping(target)
            }
            (ConfigValue::Object(mut target), ConfigValue::Object(incoming))
                if target.type_name() == incoming.type_name() =>
            {
                let (_, fields) = incoming.into_parts();
                self.merge_fields(target.fields_mut(), fields);
                ConfigValue::Object(target)
            }
            (ConfigValue::Object(mut target), ConfigValue::Mapping(incoming)) => {
                self.merge_fields(target.fields_mut(), incoming);
                ConfigValue::Object(target)
            }
            (ConfigValue::Mapping(mut target), ConfigValue::Object(incoming)) => {
                let (_, fields) = incoming.into_parts();
                self.merge_fields(&mut target, fields);
                ConfigValue::Mapping(target)
            }
            (_, incoming) => incoming,
        }
    }

    // Only keys already present in `target` are touched. A null field keeps its value.
    fn merge_fields(&self, target: &mut ConfigMap, incoming: ConfigMap) {
        for (key, value) in incoming {
            if value.is_null() {
                continue;
            }
            if let Some(slot) = target.get_mut(&key) {
                let current = std::mem::take(slot);
                *slot = self.merge_values(current, value);
            }
        }
    }
}

impl MergeStrategy for RecursiveStrategy {
    fn name(&self) -> &str {
        "recursive"
    }

    fn merge(
        &self,
        _key: &str,
        target: Option<ConfigValue>,
        incoming: ConfigValue,
        _none_considered_empty: bool,
    ) -> ConfigValue {
        match target {
            Some(target) => self.merge_values(target, incoming),
            None => incoming,
        }
    }
}
