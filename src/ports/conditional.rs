// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conditional aggregation inputs.

use crate::domain::{ConfigMap, ConfigStore, Result};

/// An aggregation input evaluated against the store being built.
///
/// A conditional sees every source aggregated before it and may contribute a partial
/// mapping, or nothing. Closures of the shape `Fn(&ConfigStore) -> Option<ConfigMap>`
/// are conditionals.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::Conditional;
/// use cfghub::domain::{ConfigMap, ConfigStore, ConfigValue};
///
/// let debug_level = |store: &ConfigStore| {
///     let debug = store.value("DEBUG").ok().flatten().and_then(ConfigValue::as_bool);
///     debug.filter(|d| *d).map(|_| {
///         let mut extra = ConfigMap::new();
///         extra.insert("LOG_LEVEL".into(), ConfigValue::from("debug"));
///         extra
///     })
/// };
///
/// let store = ConfigStore::new();
/// assert!(debug_level.condition(&store).unwrap().is_none());
/// ```
pub trait Conditional {
    /// Returns the mapping to apply, or `None` to contribute nothing.
    fn condition(&self, target: &ConfigStore) -> Result<Option<ConfigMap>>;
}

impl<F> Conditional for F
where
    F: Fn(&ConfigStore) -> Option<ConfigMap>,
{
    fn condition(&self, target: &ConfigStore) -> Result<Option<ConfigMap>> {
        Ok(self(target))
    }
}
