// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enumerated defaults with optional type annotations.
//!
//! A [`ConfigSchema`] describes a fixed set of keys, their default values and, for some
//! of them, a declared value type. Applying a schema as the first source of a store
//! fixes the type annotations that the store's value constructor uses from then on.

use crate::domain::config_value::{ConfigMap, ConfigValue};

/// One entry of a [`ConfigSchema`].
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaEntry {
    /// Raw key
    pub key: String,
    /// Default value
    pub default: ConfigValue,
    /// Declared type tag, if any
    pub value_type: Option<String>,
}

/// An ordered collection of enumerated defaults.
///
/// # Examples
///
/// ```
/// use cfghub::domain::ConfigSchema;
///
/// let schema = ConfigSchema::new("Defaults")
///     .entry("name", "John")
///     .typed_entry("age", 42, "int");
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.value_type("age"), Some("int"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigSchema {
    name: String,
    entries: Vec<SchemaEntry>,
}

impl ConfigSchema {
    /// Creates an empty schema with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds an untyped entry.
    pub fn entry(mut self, key: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        self.push(key.into(), default.into(), None);
        self
    }

    /// Adds an entry with a declared type.
    pub fn typed_entry(
        mut self,
        key: impl Into<String>,
        default: impl Into<ConfigValue>,
        value_type: impl Into<String>,
    ) -> Self {
        self.push(key.into(), default.into(), Some(value_type.into()));
        self
    }

    // Later entries with the same key replace earlier ones in place.
    fn push(&mut self, key: String, default: ConfigValue, value_type: Option<String>) {
        let entry = SchemaEntry {
            key,
            default,
            value_type,
        };
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Appends every entry of `other`.
    pub fn extend(mut self, other: ConfigSchema) -> Self {
        for entry in other.entries {
            self.push(entry.key, entry.default, entry.value_type);
        }
        self
    }

    /// Returns the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entries in declaration order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the declared type of a raw key.
    pub fn value_type(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value_type.as_deref())
    }

    /// Returns the defaults as an ordered mapping.
    pub fn defaults(&self) -> ConfigMap {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.default.clone()))
            .collect()
    }
}

/// Types that describe a set of enumerated configuration defaults.
///
/// # Examples
///
/// ```
/// use cfghub::domain::{ConfigEnum, ConfigSchema};
///
/// struct Defaults;
///
/// impl ConfigEnum for Defaults {
///     fn schema() -> ConfigSchema {
///         ConfigSchema::new("Defaults").entry("country", "Austria")
///     }
/// }
///
/// assert_eq!(Defaults::schema().name(), "Defaults");
/// ```
pub trait ConfigEnum {
    /// Returns the defaults and type annotations.
    fn schema() -> ConfigSchema;
}
