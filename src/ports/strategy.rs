// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge strategy trait definition.
//!
//! A merge strategy decides what a store keeps when a key that may already hold a value
//! receives a new one. Strategies are stateless apart from their construction options.

use crate::domain::ConfigValue;

/// A trait for combining a stored value with an incoming one.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::MergeStrategy;
/// use cfghub::domain::ConfigValue;
///
/// /// Keeps whatever arrived first.
/// struct FirstWins;
///
/// impl MergeStrategy for FirstWins {
///     fn name(&self) -> &str {
///         "first-wins"
///     }
///
///     fn merge(
///         &self,
///         _key: &str,
///         target: Option<ConfigValue>,
///         incoming: ConfigValue,
///         _none_considered_empty: bool,
///     ) -> ConfigValue {
///         target.unwrap_or(incoming)
///     }
/// }
///
/// let strategy = FirstWins;
/// let merged = strategy.merge("K", Some(ConfigValue::from(1)), ConfigValue::from(2), false);
/// assert_eq!(merged, 1);
/// ```
pub trait MergeStrategy: Send + Sync {
    /// Returns the name of this strategy, used for debugging output.
    fn name(&self) -> &str;

    /// Produces the value to store under `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The normalized key being merged
    /// * `target` - The current value, or `None` if the key is not present yet
    /// * `incoming` - The new value
    /// * `none_considered_empty` - Whether an incoming `Null` should leave the target intact
    fn merge(
        &self,
        key: &str,
        target: Option<ConfigValue>,
        incoming: ConfigValue,
        none_considered_empty: bool,
    ) -> ConfigValue;
}
