// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preprocessor trait definition.
//!
//! A preprocessor normalizes every incoming `(key, value)` pair before it is filtered
//! and merged into a store. The same preprocessor is applied to lookup keys, so callers
//! can use any spelling that normalizes to the stored key.

use crate::domain::ConfigValue;

/// A trait for normalizing configuration pairs.
///
/// Implementations must be deterministic and free of side effects. Any closure of the
/// shape `Fn(&str, ConfigValue) -> (String, ConfigValue)` is a preprocessor.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::Preprocessor;
/// use cfghub::domain::ConfigValue;
///
/// struct Lowercase;
///
/// impl Preprocessor for Lowercase {
///     fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
///         (key.to_lowercase(), value)
///     }
/// }
///
/// let (key, _) = Lowercase.process("APP_NAME", ConfigValue::Null);
/// assert_eq!(key, "app_name");
///
/// let prefixer = |key: &str, value: ConfigValue| (format!("APP_{}", key), value);
/// assert_eq!(prefixer.process("PORT", ConfigValue::Null).0, "APP_PORT");
/// ```
pub trait Preprocessor: Send + Sync {
    /// Normalizes a key/value pair.
    ///
    /// Lookup paths call this with `ConfigValue::Null` as the value and only use the
    /// returned key.
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue);

    /// Normalizes a key alone.
    fn process_key(&self, key: &str) -> String {
        self.process(key, ConfigValue::Null).0
    }
}

impl<F> Preprocessor for F
where
    F: Fn(&str, ConfigValue) -> (String, ConfigValue) + Send + Sync,
{
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        self(key, value)
    }
}
