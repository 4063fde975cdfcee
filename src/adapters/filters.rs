// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock filters.

use crate::domain::ConfigValue;
use crate::ports::Filter;
use std::collections::HashSet;
use std::fmt;

/// Admits every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Filter for AcceptAll {
    fn admit(&self, _key: &str, _value: &ConfigValue) -> bool {
        true
    }
}

/// Admits only keys from a fixed set.
///
/// The keys must already be normalized the same way as the data they are matched
/// against; [`ConfigStoreBuilder::filter_keys`](crate::domain::ConfigStoreBuilder::filter_keys)
/// does this with the store's preprocessor. An empty set admits everything.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::KeyFilter;
/// use cfghub::domain::ConfigValue;
/// use cfghub::ports::Filter;
///
/// let filter = KeyFilter::new(["HOST".to_string(), "PORT".to_string()]);
/// assert!(filter.admit("HOST", &ConfigValue::Null));
/// assert!(!filter.admit("USER", &ConfigValue::Null));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    keys: HashSet<String>,
}

impl KeyFilter {
    /// Creates a filter admitting `keys`.
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Returns the number of admitted keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the set is empty, in which case everything is admitted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Filter for KeyFilter {
    fn admit(&self, key: &str, _value: &ConfigValue) -> bool {
        self.keys.is_empty() || self.keys.contains(key)
    }
}

/// Wraps a boxed predicate as a filter.
pub struct PredicateFilter {
    predicate: Box<dyn Fn(&str, &ConfigValue) -> bool + Send + Sync>,
}

impl PredicateFilter {
    /// Creates a filter from `predicate`.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str, &ConfigValue) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Admits keys starting with `prefix`.
    pub fn key_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::new(move |key, _| key.starts_with(&prefix))
    }
}

impl fmt::Debug for PredicateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter").finish_non_exhaustive()
    }
}

impl Filter for PredicateFilter {
    fn admit(&self, key: &str, value: &ConfigValue) -> bool {
        (self.predicate)(key, value)
    }
}
