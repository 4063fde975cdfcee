// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for normalized store keys.
//!
//! Every key that enters a [`ConfigStore`](crate::domain::ConfigStore) has already been
//! run through the store's preprocessor; `ConfigKey` marks that normalized form so it is
//! not confused with raw source keys.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A normalized configuration key as held by a store.
///
/// # Examples
///
/// ```
/// use cfghub::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("DATABASE_HOST");
/// assert_eq!(key.as_str(), "DATABASE_HOST");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lookups by `&str` must hash identically to the owned key.
impl Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ConfigKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ConfigKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
