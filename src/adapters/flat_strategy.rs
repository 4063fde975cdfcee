// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat merge strategy.

use crate::domain::ConfigValue;
use crate::ports::MergeStrategy;

/// Replaces the stored value with the incoming one.
///
/// When `none_considered_empty` is set, an incoming `Null` leaves an existing value in
/// place. This is the default strategy of a store.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::FlatStrategy;
/// use cfghub::domain::ConfigValue;
/// use cfghub::ports::MergeStrategy;
///
/// let flat = FlatStrategy;
/// assert_eq!(flat.merge("K", Some(1.into()), 2.into(), false), 2);
/// assert_eq!(flat.merge("K", Some(1.into()), ConfigValue::Null, true), 1);
/// assert!(flat.merge("K", Some(1.into()), ConfigValue::Null, false).is_null());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatStrategy;

impl MergeStrategy for FlatStrategy {
    fn name(&self) -> &str {
        "flat"
    }

    fn merge(
        &self,
        _key: &str,
        target: Option<ConfigValue>,
        incoming: ConfigValue,
        none_considered_empty: bool,
    ) -> ConfigValue {
        match target {
            Some(target) if none_considered_empty && incoming.is_null() => target,
            _ => incoming,
        }
    }
}
