// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter trait definition.

use crate::domain::ConfigValue;

/// Decides whether a preprocessed pair is admitted into a store.
///
/// Filters see the key and value after preprocessing. They must be total: a filter never
/// fails, it only answers yes or no.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::Filter;
/// use cfghub::domain::ConfigValue;
///
/// let no_secrets = |key: &str, _value: &ConfigValue| !key.contains("SECRET");
/// assert!(no_secrets.admit("HOST", &ConfigValue::Null));
/// assert!(!no_secrets.admit("DB_SECRET", &ConfigValue::Null));
/// ```
pub trait Filter: Send + Sync {
    /// Returns `true` if the pair should be merged into the store.
    fn admit(&self, key: &str, value: &ConfigValue) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&str, &ConfigValue) -> bool + Send + Sync,
{
    fn admit(&self, key: &str, value: &ConfigValue) -> bool {
        self(key, value)
    }
}
