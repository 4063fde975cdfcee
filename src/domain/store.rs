// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration store.
//!
//! A [`ConfigStore`] is an ordered key/value container that runs every incoming source
//! through its preprocessor, filter and merge strategy, and keeps one provenance record
//! per applied source. Stores are built once during startup and read many times after.

use crate::adapters::{FlatStrategy, IdentityPreprocessor, KeyFilter, TypedValueConstructor};
use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ConfigError, Result};
use crate::domain::record::{AppliedConf, Origin, SourceKind, SourceMeta};
use crate::domain::schema::ConfigSchema;
use crate::domain::source::{Classified, ConfigSource};
use crate::ports::{Filter, MergeStrategy, Preprocessor, ValueConstructor};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Add;
use std::sync::Arc;

/// Admission policy of a store.
#[derive(Clone)]
enum Admission {
    All,
    Custom(Arc<dyn Filter>),
    InitialKeys,
}

/// An ordered configuration store with provenance tracking.
///
/// # Examples
///
/// ```
/// use cfghub::domain::{ConfigMap, ConfigStore, ConfigValue};
/// use cfghub::adapters::StandardPreprocessor;
///
/// let mut defaults = ConfigMap::new();
/// defaults.insert("db host".into(), ConfigValue::from("localhost"));
///
/// let mut store = ConfigStore::builder()
///     .preprocessor(StandardPreprocessor::new())
///     .initial(defaults)
///     .build()
///     .unwrap();
///
/// store.set("db-host", "db.internal").unwrap();
///
/// assert_eq!(store.get("DB_HOST").unwrap(), Some(&ConfigValue::from("db.internal")));
/// assert_eq!(store.applied_confs().len(), 2);
/// ```
#[derive(Clone)]
pub struct ConfigStore {
    storage: IndexMap<ConfigKey, ConfigValue>,
    preprocessor: Arc<dyn Preprocessor>,
    admission: Admission,
    strategy: Arc<dyn MergeStrategy>,
    constructor: Option<Arc<dyn ValueConstructor>>,
    strict_keys: bool,
    return_default_on_none: bool,
    none_considered_empty: bool,
    applied_confs: Vec<AppliedConf>,
    initial_keys: Vec<ConfigKey>,
    schema: Option<ConfigSchema>,
    name: Option<String>,
    origin: Option<Origin>,
    kind: SourceKind,
    handler: Option<String>,
}

impl ConfigStore {
    /// Creates an empty store with default components.
    pub fn new() -> Self {
        ConfigStoreBuilder::new().assemble().0
    }

    /// Returns a builder for a store.
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    /// Creates a store with default components, populated from `source`.
    pub fn from_source(source: impl Into<ConfigSource>) -> Result<Self> {
        ConfigStoreBuilder::new().initial(source).build()
    }

    /// Applies a source with the default metadata of its shape.
    ///
    /// Unlike [`update`](Self::update), this does not enforce strict keys.
    pub fn apply(&mut self, source: impl Into<ConfigSource>) -> Result<&mut Self> {
        self.apply_with(source, SourceMeta::new())
    }

    /// Applies a source, overriding its default metadata with `meta`.
    ///
    /// Empty sources are ignored and leave no record. Every other source appends exactly
    /// one record, even when the filter admitted none of its keys.
    pub fn apply_with(
        &mut self,
        source: impl Into<ConfigSource>,
        meta: SourceMeta,
    ) -> Result<&mut Self> {
        let classified = source.into().classify(meta);
        self.apply_classified(classified)?;
        Ok(self)
    }

    fn apply_classified(&mut self, classified: Classified) -> Result<()> {
        let Classified { data, meta, schema } = classified;
        if data.is_empty() {
            return Ok(());
        }

        let adopted = schema.filter(|_| self.applied_confs.is_empty() && self.schema.is_none());
        let typed = self.typed_keys(adopted.as_ref().or(self.schema.as_ref()));

        // Nothing is written until every value has been constructed.
        let mut staged: Vec<(ConfigKey, ConfigValue)> = Vec::with_capacity(data.len());
        for (raw_key, raw_value) in &data {
            let mut value = raw_value.clone();
            if let Some(constructor) = &self.constructor {
                if let Some(type_tag) = typed.get(&self.preprocessor.process_key(raw_key)) {
                    if !value.is_null() {
                        value = constructor.construct(type_tag, value)?;
                    }
                }
            }

            let (key, value) = self.preprocessor.process(raw_key, value);
            if self.admits(&key, &value) {
                staged.push((ConfigKey::from(key), value));
            }
        }

        if adopted.is_some() {
            self.schema = adopted;
        }

        let mut applied_keys: Vec<ConfigKey> = Vec::new();
        for (key, value) in staged {
            match self.storage.get_mut(&key) {
                Some(slot) => {
                    let target = std::mem::take(slot);
                    *slot = self.strategy.merge(
                        key.as_str(),
                        Some(target),
                        value,
                        self.none_considered_empty,
                    );
                }
                None => {
                    let merged =
                        self.strategy
                            .merge(key.as_str(), None, value, self.none_considered_empty);
                    self.storage.insert(key.clone(), merged);
                }
            }

            if !applied_keys.contains(&key) {
                applied_keys.push(key);
            }
        }

        if self.initial_keys.is_empty() {
            self.initial_keys = data
                .keys()
                .map(|k| ConfigKey::from(self.preprocessor.process_key(k)))
                .collect();
        }

        let record = AppliedConf {
            applied_keys,
            kind: meta.kind.unwrap_or(SourceKind::Store),
            name: meta.name,
            origin: meta.origin,
            handler: meta.handler,
            payload: Arc::new(data),
        };
        tracing::trace!(
            "Applied {} of {} keys from {}",
            record.applied_keys.len(),
            record.payload.len(),
            record
        );
        self.applied_confs.push(record);

        Ok(())
    }

    // Declared value types keyed by their normalized key.
    fn typed_keys(&self, schema: Option<&ConfigSchema>) -> HashMap<String, String> {
        schema
            .into_iter()
            .flat_map(|schema| schema.entries())
            .filter_map(|entry| {
                entry
                    .value_type
                    .as_ref()
                    .map(|t| (self.preprocessor.process_key(&entry.key), t.clone()))
            })
            .collect()
    }

    fn admits(&self, key: &str, value: &ConfigValue) -> bool {
        match &self.admission {
            Admission::All => true,
            Admission::Custom(filter) => filter.admit(key, value),
            Admission::InitialKeys => {
                self.initial_keys.is_empty() || self.initial_keys.iter().any(|k| k == key)
            }
        }
    }

    fn check_strict(&self, key: &str) -> Result<()> {
        if self.strict_keys && !self.storage.contains_key(key) {
            return Err(ConfigError::strict_keys(key));
        }
        Ok(())
    }

    /// Looks up a value.
    ///
    /// The key is preprocessed first. When `return_default_on_none` is set, a stored
    /// `Null` is reported as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrictKeysViolation`] if strict keys are enabled and the
    /// key is unknown.
    pub fn get(&self, key: &str) -> Result<Option<&ConfigValue>> {
        let key = self.preprocessor.process_key(key);
        self.check_strict(&key)?;

        Ok(match self.storage.get(key.as_str()) {
            Some(value) if value.is_null() && self.return_default_on_none => None,
            other => other,
        })
    }

    /// Looks up a value, falling back to `default`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfghub::domain::{ConfigStore, ConfigValue};
    ///
    /// let mut store = ConfigStore::new();
    /// store.set("level", ConfigValue::Null).unwrap();
    ///
    /// assert_eq!(store.get_or("level", "info".into()).unwrap(), "info");
    /// assert_eq!(store.get_or("missing", 3.into()).unwrap(), 3);
    /// ```
    pub fn get_or(&self, key: &str, default: ConfigValue) -> Result<ConfigValue> {
        Ok(self.get(key)?.cloned().unwrap_or(default))
    }

    /// Looks up a value and deserializes it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigKeyNotFound`] if the key is absent and
    /// [`ConfigError::TypeConversionError`] if it cannot be deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.get(key)? {
            Some(value) => value.deserialize(key),
            None => Err(ConfigError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Returns the stored value, without default handling.
    ///
    /// A stored `Null` is returned as `Some(&ConfigValue::Null)`.
    pub fn value(&self, key: &str) -> Result<Option<&ConfigValue>> {
        let key = self.preprocessor.process_key(key);
        self.check_strict(&key)?;
        Ok(self.storage.get(key.as_str()))
    }

    /// Sets a single value, attributing it to the caller's source location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrictKeysViolation`] if strict keys are enabled and the
    /// key is unknown.
    #[track_caller]
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<&mut Self> {
        let caller = std::panic::Location::caller();
        let name = format!("{}:{}", caller.file(), caller.line());
        let origin = Origin::Location {
            file: caller.file().to_string(),
            line: caller.line(),
            column: caller.column(),
        };
        self.set_single(key, value.into(), name, origin)
    }

    /// Sets a single value with an explicit origin.
    pub fn set_with_origin(
        &mut self,
        key: &str,
        value: impl Into<ConfigValue>,
        origin: Origin,
    ) -> Result<&mut Self> {
        let name = origin.to_string();
        self.set_single(key, value.into(), name, origin)
    }

    fn set_single(
        &mut self,
        key: &str,
        value: ConfigValue,
        name: String,
        origin: Origin,
    ) -> Result<&mut Self> {
        self.check_strict(&self.preprocessor.process_key(key))?;

        let mut data = ConfigMap::new();
        data.insert(key.to_string(), value);
        self.apply_with(
            data,
            SourceMeta::new()
                .name(name)
                .origin(origin)
                .kind(SourceKind::SingleValue),
        )
    }

    /// Returns `true` if the store holds exactly this key.
    ///
    /// The key is not preprocessed and strict keys are not enforced.
    pub fn contains(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, ConfigKey, ConfigValue> {
        self.storage.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, ConfigKey, ConfigValue> {
        self.storage.values()
    }

    /// Iterates over pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ConfigKey, ConfigValue> {
        self.storage.iter()
    }

    /// Returns a copy of the stored pairs.
    pub fn to_map(&self) -> ConfigMap {
        self.storage
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Merges a source after checking strict keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrictKeysViolation`] for the first incoming key that is
    /// unknown while strict keys are enabled. Nothing is applied in that case.
    pub fn update(&mut self, source: impl Into<ConfigSource>) -> Result<&mut Self> {
        let source = source.into();
        if self.strict_keys {
            for raw_key in source.raw_keys() {
                self.check_strict(&self.preprocessor.process_key(raw_key))?;
            }
        }
        self.apply(source)
    }

    /// Removes a single key without recording it.
    ///
    /// The key is not preprocessed.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.storage.shift_remove(key)
    }

    /// Always fails: a store cannot be cleared.
    pub fn clear(&mut self) -> Result<()> {
        Err(ConfigError::not_permitted("clear"))
    }

    /// Always fails: a store cannot be popped from.
    pub fn pop(&mut self, _key: &str) -> Result<ConfigValue> {
        Err(ConfigError::not_permitted("pop"))
    }

    /// Always fails: a store cannot be popped from.
    pub fn pop_item(&mut self) -> Result<(ConfigKey, ConfigValue)> {
        Err(ConfigError::not_permitted("popitem"))
    }

    /// Returns the most recent record that set `key`.
    pub fn applied_from(&self, key: &str) -> Option<&AppliedConf> {
        self.applied_from_with(key, false)
    }

    /// Returns the most recent record that set `key`, optionally also matching records
    /// whose raw payload carries `key` before preprocessing.
    pub fn applied_from_with(&self, key: &str, include_unprocessed: bool) -> Option<&AppliedConf> {
        let normalized = self.preprocessor.process_key(key);
        self.applied_confs.iter().rev().find(|record| {
            record.sets(&normalized) || (include_unprocessed && record.carries_raw(key))
        })
    }

    /// Returns every record in the order it was applied.
    pub fn applied_confs(&self) -> &[AppliedConf] {
        &self.applied_confs
    }

    /// Returns the normalized keys of the first population.
    pub fn initial_keys(&self) -> &[ConfigKey] {
        &self.initial_keys
    }

    /// Returns the schema learned from a first enumerated-defaults population.
    pub fn schema(&self) -> Option<&ConfigSchema> {
        self.schema.as_ref()
    }

    /// Returns the store name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the store origin.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Returns the store kind.
    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Returns the name of the handler that produced the store.
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    /// Returns the merge strategy.
    pub fn strategy(&self) -> &dyn MergeStrategy {
        self.strategy.as_ref()
    }

    /// Returns whether strict keys are enforced.
    pub fn strict_keys(&self) -> bool {
        self.strict_keys
    }

    /// Returns whether a stored `Null` falls back to the lookup default.
    pub fn return_default_on_none(&self) -> bool {
        self.return_default_on_none
    }

    /// Returns whether an incoming `Null` keeps the existing value.
    pub fn none_considered_empty(&self) -> bool {
        self.none_considered_empty
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ConfigStore {
    type Item = (&'a ConfigKey, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, ConfigKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}

impl<S: Into<ConfigSource>> Add<S> for ConfigStore {
    type Output = Result<ConfigStore>;

    fn add(mut self, rhs: S) -> Self::Output {
        self.update(rhs)?;
        Ok(self)
    }
}

impl Serialize for ConfigStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.storage.len()))?;
        for (k, v) in &self.storage {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ConfigValue::Mapping(self.to_map()))
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("strategy", &self.strategy.name())
            .field("strict_keys", &self.strict_keys)
            .field("storage", &self.storage)
            .field("applied_confs", &self.applied_confs.len())
            .finish()
    }
}

enum FilterChoice {
    None,
    Custom(Arc<dyn Filter>),
    Keys(Vec<String>),
    InitialKeys,
}

/// Builder for [`ConfigStore`].
///
/// # Examples
///
/// ```
/// use cfghub::domain::{ConfigMap, ConfigStore, ConfigValue};
/// use cfghub::adapters::RecursiveStrategy;
///
/// let mut initial = ConfigMap::new();
/// initial.insert("A".into(), ConfigValue::from(1));
///
/// let store = ConfigStore::builder()
///     .initial(initial)
///     .name("defaults")
///     .strict_keys(true)
///     .strategy(RecursiveStrategy::new())
///     .build()
///     .unwrap();
///
/// assert!(store.get("B").is_err());
/// assert_eq!(store.name(), Some("defaults"));
/// ```
pub struct ConfigStoreBuilder {
    initial: Option<ConfigSource>,
    meta: SourceMeta,
    preprocessor: Option<Arc<dyn Preprocessor>>,
    filter: FilterChoice,
    return_default_on_none: bool,
    strict_keys: bool,
    none_considered_empty: bool,
    strategy: Option<Arc<dyn MergeStrategy>>,
    constructor: Option<Arc<dyn ValueConstructor>>,
}

impl ConfigStoreBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            initial: None,
            meta: SourceMeta::new(),
            preprocessor: None,
            filter: FilterChoice::None,
            return_default_on_none: true,
            strict_keys: false,
            none_considered_empty: false,
            strategy: None,
            constructor: Some(Arc::new(TypedValueConstructor::new())),
        }
    }

    /// Sets the source applied on build.
    pub fn initial(mut self, source: impl Into<ConfigSource>) -> Self {
        self.initial = Some(source.into());
        self
    }

    /// Sets the store name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    /// Sets the store origin.
    pub fn origin(mut self, origin: Origin) -> Self {
        self.meta.origin = Some(origin);
        self
    }

    /// Sets the store kind.
    pub fn kind(mut self, kind: SourceKind) -> Self {
        self.meta.kind = Some(kind);
        self
    }

    /// Sets the name of the handler that produced the store.
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.meta.handler = Some(handler.into());
        self
    }

    /// Replaces all store metadata at once.
    pub fn meta(mut self, meta: SourceMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Sets the preprocessor.
    pub fn preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Some(Arc::new(preprocessor));
        self
    }

    /// Sets a custom filter.
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = FilterChoice::Custom(Arc::new(filter));
        self
    }

    /// Admits only the given keys.
    ///
    /// The keys are normalized by the store's preprocessor. An empty set admits
    /// everything.
    pub fn filter_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.filter = FilterChoice::Keys(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Admits only the keys seen during the first population.
    pub fn filter_initial_keys(mut self) -> Self {
        self.filter = FilterChoice::InitialKeys;
        self
    }

    /// Sets whether a stored `Null` falls back to the lookup default.
    pub fn return_default_on_none(mut self, enabled: bool) -> Self {
        self.return_default_on_none = enabled;
        self
    }

    /// Sets whether keys outside of the initial set are rejected.
    pub fn strict_keys(mut self, enabled: bool) -> Self {
        self.strict_keys = enabled;
        self
    }

    /// Sets whether an incoming `Null` keeps the existing value.
    pub fn none_considered_empty(mut self, enabled: bool) -> Self {
        self.none_considered_empty = enabled;
        self
    }

    /// Sets the merge strategy.
    pub fn strategy(mut self, strategy: impl MergeStrategy + 'static) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Sets the value constructor used for typed enumerated defaults.
    pub fn value_constructor(mut self, constructor: impl ValueConstructor + 'static) -> Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Stores values exactly as they arrive, even for typed enumerated defaults.
    pub fn without_value_constructor(mut self) -> Self {
        self.constructor = None;
        self
    }

    /// Builds the store and applies the initial source.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial source cannot be applied.
    pub fn build(self) -> Result<ConfigStore> {
        let (mut store, initial) = self.assemble();
        if let Some(classified) = initial {
            store.apply_classified(classified)?;
        }
        Ok(store)
    }

    fn assemble(self) -> (ConfigStore, Option<Classified>) {
        let preprocessor: Arc<dyn Preprocessor> = self
            .preprocessor
            .unwrap_or_else(|| Arc::new(IdentityPreprocessor));

        let admission = match self.filter {
            FilterChoice::None => Admission::All,
            FilterChoice::Custom(filter) => Admission::Custom(filter),
            FilterChoice::Keys(keys) => Admission::Custom(Arc::new(KeyFilter::new(
                keys.iter().map(|k| preprocessor.process_key(k)),
            ))),
            FilterChoice::InitialKeys => Admission::InitialKeys,
        };

        let initial = self.initial.map(|source| source.classify(self.meta.clone()));
        let meta = initial
            .as_ref()
            .map(|c| c.meta.clone())
            .unwrap_or(self.meta);

        let store = ConfigStore {
            storage: IndexMap::new(),
            preprocessor,
            admission,
            strategy: self.strategy.unwrap_or_else(|| Arc::new(FlatStrategy)),
            constructor: self.constructor,
            strict_keys: self.strict_keys,
            return_default_on_none: self.return_default_on_none,
            none_considered_empty: self.none_considered_empty,
            applied_confs: Vec::new(),
            initial_keys: Vec::new(),
            schema: None,
            name: meta.name,
            origin: meta.origin,
            kind: meta.kind.unwrap_or(SourceKind::Store),
            handler: meta.handler,
        };

        (store, initial)
    }
}

impl Default for ConfigStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CastingPreprocessor, RecursiveStrategy, StandardPreprocessor};

    fn map(pairs: &[(&str, ConfigValue)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ConfigStore::new();
        assert!(store.is_empty());
        assert_eq!(store.kind(), &SourceKind::Store);
        assert!(store.applied_confs().is_empty());
        assert_eq!(store.strategy().name(), "flat");
    }

    #[test]
    fn test_apply_records_once_per_source() {
        let mut store = ConfigStore::new();
        store
            .apply(map(&[("A", 1.into()), ("B", 2.into())]))
            .unwrap()
            .apply(map(&[("B", 3.into())]))
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.applied_confs().len(), 2);
        assert_eq!(store.value("B").unwrap(), Some(&ConfigValue::from(3)));
        assert_eq!(store.applied_confs()[1].kind, SourceKind::Dict);
    }

    #[test]
    fn test_empty_source_is_noop() {
        let mut store = ConfigStore::new();
        store.apply(ConfigMap::new()).unwrap();
        assert!(store.applied_confs().is_empty());
    }

    #[test]
    fn test_record_appended_when_nothing_admitted() {
        let mut store = ConfigStore::builder()
            .filter(|_key: &str, _value: &ConfigValue| false)
            .build()
            .unwrap();
        store.apply(map(&[("A", 1.into())])).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.applied_confs().len(), 1);
        assert!(store.applied_confs()[0].applied_keys.is_empty());
    }

    #[test]
    fn test_standard_preprocessing_on_get() {
        let store = ConfigStore::builder()
            .preprocessor(StandardPreprocessor::new())
            .initial(map(&[("my key #1", "v".into())]))
            .build()
            .unwrap();

        assert!(store.contains("MY_KEY_1"));
        assert!(!store.contains("my key #1"));
        assert_eq!(store.get("my-key-1").unwrap(), Some(&ConfigValue::from("v")));
    }

    #[test]
    fn test_get_default_on_stored_null() {
        let store = ConfigStore::from_source(map(&[("A", ConfigValue::Null)])).unwrap();
        assert_eq!(store.get("A").unwrap(), None);
        assert_eq!(store.get_or("A", 5.into()).unwrap(), 5);
        assert_eq!(store.value("A").unwrap(), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_get_returns_stored_null_when_disabled() {
        let store = ConfigStore::builder()
            .return_default_on_none(false)
            .initial(map(&[("A", ConfigValue::Null)]))
            .build()
            .unwrap();
        assert_eq!(store.get_or("A", 5.into()).unwrap(), ConfigValue::Null);
        assert_eq!(store.get_or("B", 5.into()).unwrap(), 5);
    }

    #[test]
    fn test_get_as() {
        let store = ConfigStore::from_source(map(&[("PORT", 8080.into())])).unwrap();
        let port: u16 = store.get_as("PORT").unwrap();
        assert_eq!(port, 8080);

        let missing: Result<u16> = store.get_as("HOST");
        assert!(matches!(missing, Err(ConfigError::ConfigKeyNotFound { .. })));
    }

    #[test]
    fn test_strict_keys() {
        let mut store = ConfigStore::builder()
            .strict_keys(true)
            .initial(map(&[("A", 1.into()), ("B", 2.into())]))
            .build()
            .unwrap();

        assert!(matches!(
            store.get("C"),
            Err(ConfigError::StrictKeysViolation { .. })
        ));
        assert!(store.set("C", 1).is_err());
        assert!(store.update(map(&[("A", 9.into()), ("C", 1.into())])).is_err());
        assert_eq!(store.value("A").unwrap(), Some(&ConfigValue::from(1)));

        store.set("A", 2).unwrap();
        assert_eq!(store.value("A").unwrap(), Some(&ConfigValue::from(2)));
        assert!(!store.contains("C"));
    }

    #[test]
    fn test_strict_keys_apply_is_unchecked() {
        let mut store = ConfigStore::builder()
            .strict_keys(true)
            .initial(map(&[("A", 1.into())]))
            .build()
            .unwrap();
        store.apply(map(&[("C", 3.into())])).unwrap();
        assert_eq!(store.get("C").unwrap(), Some(&ConfigValue::from(3)));
    }

    #[test]
    fn test_filter_keys_normalized() {
        let mut store = ConfigStore::builder()
            .preprocessor(StandardPreprocessor::new())
            .filter_keys(["db host", "port"])
            .build()
            .unwrap();
        store
            .apply(map(&[("db-host", "h".into()), ("user", "u".into()), ("PORT", 1.into())]))
            .unwrap();

        let keys: Vec<&str> = store.keys().map(ConfigKey::as_str).collect();
        assert_eq!(keys, vec!["DB_HOST", "PORT"]);
    }

    #[test]
    fn test_empty_filter_keys_admit_everything() {
        let store = ConfigStore::builder()
            .filter_keys(Vec::<String>::new())
            .initial(map(&[("A", 1.into())]))
            .build()
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_filter_initial_keys() {
        let mut store = ConfigStore::builder()
            .filter_initial_keys()
            .initial(map(&[("A", 1.into()), ("B", 2.into())]))
            .build()
            .unwrap();
        store.apply(map(&[("A", 10.into()), ("C", 3.into())])).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.value("A").unwrap(), Some(&ConfigValue::from(10)));
        assert!(!store.contains("C"));
        assert_eq!(store.initial_keys().len(), 2);
    }

    #[test]
    fn test_none_considered_empty() {
        let mut store = ConfigStore::builder()
            .none_considered_empty(true)
            .initial(map(&[("A", 1.into())]))
            .build()
            .unwrap();
        store.apply(map(&[("A", ConfigValue::Null)])).unwrap();
        assert_eq!(store.value("A").unwrap(), Some(&ConfigValue::from(1)));
    }

    #[test]
    fn test_set_records_call_site() {
        let mut store = ConfigStore::new();
        store.set("A", 1).unwrap();

        let record = store.applied_from("A").unwrap();
        assert_eq!(record.kind, SourceKind::SingleValue);
        let name = record.name.as_deref().unwrap();
        assert!(name.starts_with(file!()));
        assert!(matches!(&record.origin, Some(Origin::Location { file, .. }) if file == file!()));
    }

    #[test]
    fn test_set_with_origin() {
        let mut store = ConfigStore::new();
        store
            .set_with_origin("A", 1, Origin::Text("admin console".into()))
            .unwrap();
        let record = store.applied_from("A").unwrap();
        assert_eq!(record.name.as_deref(), Some("admin console"));
    }

    #[test]
    fn test_applied_from_most_recent() {
        let mut store = ConfigStore::new();
        store
            .apply_with(map(&[("A", 1.into())]), SourceMeta::new().name("first"))
            .unwrap();
        store
            .apply_with(map(&[("A", 2.into())]), SourceMeta::new().name("second"))
            .unwrap();
        store
            .apply_with(map(&[("B", 3.into())]), SourceMeta::new().name("third"))
            .unwrap();

        assert_eq!(store.applied_from("A").unwrap().name.as_deref(), Some("second"));
        assert!(store.applied_from("Z").is_none());
    }

    #[test]
    fn test_applied_from_unprocessed_key() {
        let store = ConfigStore::builder()
            .preprocessor(StandardPreprocessor::new())
            .initial(map(&[("db.host", "h".into())]))
            .build()
            .unwrap();
        assert!(store.applied_from_with("db.host", true).is_some());
        assert!(store.applied_from("DB_HOST").is_some());
    }

    #[test]
    fn test_restricted_operations() {
        let mut store = ConfigStore::from_source(map(&[("A", 1.into())])).unwrap();
        assert!(matches!(store.clear(), Err(ConfigError::NotPermitted { .. })));
        assert!(store.pop("A").is_err());
        assert!(store.pop_item().is_err());
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove("A"), Some(ConfigValue::from(1)));
        assert!(store.is_empty());
        assert_eq!(store.applied_confs().len(), 1);
    }

    #[test]
    fn test_add_operator() {
        let store = ConfigStore::from_source(map(&[("A", 1.into())])).unwrap();
        let store = (store + map(&[("B", 2.into())])).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_nested_store_inherits_metadata() {
        let inner = ConfigStore::builder()
            .name("inner.json")
            .kind(SourceKind::Json)
            .handler("JSON")
            .initial(map(&[("A", 1.into())]))
            .build()
            .unwrap();

        let mut outer = ConfigStore::new();
        outer.apply(inner).unwrap();
        let record = outer.applied_from("A").unwrap();
        assert_eq!(record.kind, SourceKind::Json);
        assert_eq!(record.name.as_deref(), Some("inner.json"));
        assert_eq!(record.handler.as_deref(), Some("JSON"));
    }

    #[test]
    fn test_store_metadata_from_initial_source() {
        let store =
            ConfigStore::from_source(ConfigSource::Environment(map(&[("HOME", "/root".into())])))
                .unwrap();
        assert_eq!(store.name(), Some("environ"));
        assert_eq!(store.kind(), &SourceKind::Environment);
    }

    #[test]
    fn test_enum_defaults_drive_value_construction() {
        let schema = ConfigSchema::new("Defaults")
            .typed_entry("age", 0, "int")
            .entry("name", "nobody");
        let mut store = ConfigStore::from_source(schema).unwrap();
        assert!(store.schema().is_some());

        store.apply(map(&[("age", "34".into())])).unwrap();
        assert_eq!(store.value("age").unwrap(), Some(&ConfigValue::from(34)));

        let result = store.apply(map(&[("age", "old".into())]));
        assert!(matches!(result, Err(ConfigError::ValueConstruction { .. })));
    }

    #[test]
    fn test_failed_construction_leaves_store_untouched() {
        let schema = ConfigSchema::new("Defaults")
            .entry("name", "nobody")
            .typed_entry("age", 0, "int");
        let mut store = ConfigStore::from_source(schema).unwrap();

        let result = store.apply(map(&[("name", "alice".into()), ("age", "old".into())]));
        assert!(matches!(result, Err(ConfigError::ValueConstruction { .. })));

        assert_eq!(store.value("name").unwrap(), Some(&ConfigValue::from("nobody")));
        assert_eq!(store.value("age").unwrap(), Some(&ConfigValue::from(0)));
        assert_eq!(store.applied_confs().len(), 1);
        assert_eq!(store.applied_from("name").unwrap().name.as_deref(), Some("Defaults"));
    }

    #[test]
    fn test_failed_first_apply_adopts_no_schema() {
        let schema = ConfigSchema::new("Broken").typed_entry("age", "old", "int");
        let mut store = ConfigStore::new();

        assert!(store.apply(schema).is_err());
        assert!(store.schema().is_none());
        assert!(store.is_empty());
        assert!(store.applied_confs().is_empty());
        assert!(store.initial_keys().is_empty());
    }

    #[test]
    fn test_without_value_constructor() {
        let schema = ConfigSchema::new("Defaults").typed_entry("age", 0, "int");
        let mut store = ConfigStore::builder()
            .without_value_constructor()
            .initial(schema)
            .build()
            .unwrap();
        store.apply(map(&[("age", "34".into())])).unwrap();
        assert_eq!(store.value("age").unwrap(), Some(&ConfigValue::from("34")));
    }

    #[test]
    fn test_recursive_strategy_in_store() {
        let mut store = ConfigStore::builder()
            .strategy(RecursiveStrategy::new().merge_sequences(true))
            .initial(map(&[("L", vec![1, 2].into())]))
            .build()
            .unwrap();
        store.apply(map(&[("L", vec![3].into())])).unwrap();
        assert_eq!(store.value("L").unwrap(), Some(&ConfigValue::from(vec![1, 2, 3])));
    }

    #[test]
    fn test_casting_preprocessor_in_store() {
        let store = ConfigStore::builder()
            .preprocessor(CastingPreprocessor::new())
            .initial(map(&[("DEBUG", "yes".into()), ("PORT", "80".into())]))
            .build()
            .unwrap();
        assert_eq!(store.value("DEBUG").unwrap(), Some(&ConfigValue::from(true)));
        assert_eq!(store.value("PORT").unwrap(), Some(&ConfigValue::from(80)));
    }

    #[test]
    fn test_iteration_and_display() {
        let store =
            ConfigStore::from_source(map(&[("B", 1.into()), ("A", "x".into())])).unwrap();
        let pairs: Vec<(String, ConfigValue)> = store
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        assert_eq!(pairs[0].0, "B");
        assert_eq!((&store).into_iter().count(), 2);
        assert_eq!(store.to_string(), r#"{"B":1,"A":"x"}"#);
        assert_eq!(serde_json::to_string(&store).unwrap(), r#"{"B":1,"A":"x"}"#);
    }
}
