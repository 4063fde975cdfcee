// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides an adapter that snapshots the process environment into a
//! [`ConfigSource::Environment`], which a store records under the name `environ`.

use crate::domain::{ConfigMap, ConfigSource, ConfigValue};
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for environment variables.
///
/// This adapter reads environment variables as string values. It supports optional
/// prefix filtering (e.g., only read variables starting with "APP_") and simple key
/// transformations. Value casting is left to the store's preprocessor.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::EnvVarAdapter;
/// use cfghub::domain::{ConfigStore, SourceKind};
///
/// // Read all environment variables
/// let store = ConfigStore::from_source(EnvVarAdapter::new()).unwrap();
/// assert_eq!(store.kind(), &SourceKind::Environment);
///
/// // Read only variables with a specific prefix
/// let adapter = EnvVarAdapter::with_prefix("APP_");
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Whether to replace underscores with dots
    replace_underscores: bool,
    /// Fixed values used instead of the process environment
    values: Option<HashMap<String, String>>,
}

impl EnvVarAdapter {
    /// Creates a new environment variable adapter without prefix filtering.
    ///
    /// This will read all environment variables available to the process.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: false,
            values: None,
        }
    }

    /// Creates a new environment variable adapter with prefix filtering.
    ///
    /// Only environment variables starting with the given prefix will be read.
    /// The prefix is stripped from the key.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The prefix to filter environment variables (e.g., "APP_")
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets whether to convert keys to lowercase.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfghub::adapters::EnvVarAdapter;
    ///
    /// let adapter = EnvVarAdapter::new()
    ///     .lowercase_keys(true);
    /// ```
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether to replace underscores with dots in keys.
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Creates an adapter with pre-populated values for testing.
    ///
    /// **Note**: This method is primarily intended for testing. The values are used
    /// instead of the process environment; prefix filtering and key transformations
    /// still apply.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfghub::adapters::EnvVarAdapter;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("APP_PORT".to_string(), "8080".to_string());
    ///
    /// let vars = EnvVarAdapter::with_values(values).prefix("APP_").load();
    /// assert_eq!(vars["PORT"], "8080");
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: Some(values),
            ..Self::new()
        }
    }

    /// Sets the prefix filter.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Reads the variables into a mapping, sorted by key.
    pub fn load(&self) -> ConfigMap {
        let mut vars: Vec<(String, String)> = match &self.values {
            Some(values) => values.clone().into_iter().collect(),
            None => env::vars().collect(),
        };
        vars.sort();

        let mut loaded = ConfigMap::new();

        for (key, value) in vars {
            // Validate input sizes to prevent DoS
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            // Apply prefix filtering
            let key = match &self.prefix {
                Some(prefix) => match key.strip_prefix(prefix.as_str()) {
                    Some(stripped) => stripped.to_string(),
                    None => continue,
                },
                None => key,
            };

            // Apply transformations
            let mut transformed_key = key;
            if self.lowercase_keys {
                transformed_key = transformed_key.to_lowercase();
            }
            if self.replace_underscores {
                transformed_key = transformed_key.replace('_', ".");
            }

            loaded.insert(transformed_key, ConfigValue::from(value));
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, replace_underscores={})",
            loaded.len(),
            self.prefix,
            self.lowercase_keys,
            self.replace_underscores
        );

        loaded
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<EnvVarAdapter> for ConfigSource {
    fn from(adapter: EnvVarAdapter) -> Self {
        ConfigSource::Environment(adapter.load())
    }
}
