// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value constructor trait definition.
//!
//! When a store is first populated from enumerated defaults with declared value types,
//! every later value for such a key is passed through the store's value constructor.
//! The capability is optional; without it, values are stored exactly as they arrive.

use crate::domain::{ConfigValue, Result};

/// Builds a typed value from a raw one.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::ValueConstructor;
/// use cfghub::domain::{ConfigError, ConfigValue, Result};
///
/// struct Uppercase;
///
/// impl ValueConstructor for Uppercase {
///     fn construct(&self, type_tag: &str, raw: ConfigValue) -> Result<ConfigValue> {
///         match (type_tag, raw) {
///             ("upper", ConfigValue::String(s)) => Ok(ConfigValue::from(s.to_uppercase())),
///             (_, raw) => Ok(raw),
///         }
///     }
/// }
///
/// let value = Uppercase.construct("upper", ConfigValue::from("abc")).unwrap();
/// assert_eq!(value, "ABC");
/// ```
pub trait ValueConstructor: Send + Sync {
    /// Produces a value of the declared type from `raw`, or fails.
    ///
    /// `Null` must be returned unchanged.
    fn construct(&self, type_tag: &str, raw: ConfigValue) -> Result<ConfigValue>;
}
