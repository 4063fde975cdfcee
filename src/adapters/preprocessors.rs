// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key and value preprocessors.
//!
//! This module provides the stock [`Preprocessor`] implementations: identity, key
//! standardization, value casting, renaming and chaining.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::Preprocessor;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::fmt;
use std::sync::Arc;

/// Default pattern of characters replaced by [`StandardPreprocessor`].
pub const STANDARD_REPLACE_PATTERN: &str = "[^0-9a-zA-Z_]+";

static STANDARD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(STANDARD_REPLACE_PATTERN).expect("Failed to compile standard key pattern")
});

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[+-]?[0-9]+$").expect("Failed to compile integer pattern"));

static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[+-]?[0-9.]+$").expect("Failed to compile float pattern"));

const TRUE_TOKENS: &[&str] = &["yes", "y", "t", "true", "+", "enable", "enabled", "on"];
const FALSE_TOKENS: &[&str] = &["no", "n", "f", "false", "-", "disable", "disabled", "off"];
const NULL_TOKENS: &[&str] = &["null", "none", "nil", ""];

/// Leaves pairs unchanged. This is the default preprocessor of a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPreprocessor;

impl Preprocessor for IdentityPreprocessor {
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        (key.to_string(), value)
    }
}

/// Normalizes keys to upper snake case.
///
/// Every run of characters outside `[0-9a-zA-Z_]` is replaced with a single `_` and the
/// result is uppercased. Values pass through.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::StandardPreprocessor;
/// use cfghub::ports::Preprocessor;
///
/// let preprocessor = StandardPreprocessor::new();
/// assert_eq!(preprocessor.process_key("my key #1"), "MY_KEY_1");
/// assert_eq!(preprocessor.process_key("my    KEy-----5"), "MY_KEY_5");
/// ```
#[derive(Clone)]
pub struct StandardPreprocessor {
    pattern: Regex,
    replacement: String,
}

impl StandardPreprocessor {
    /// Creates a preprocessor with the default pattern and `_` as replacement.
    pub fn new() -> Self {
        Self {
            pattern: STANDARD_PATTERN.clone(),
            replacement: "_".to_string(),
        }
    }

    /// Creates a preprocessor with a custom pattern and replacement.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the pattern is not a valid regex.
    pub fn with_pattern(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::ParseError {
            message: format!("Invalid key pattern '{}'", pattern),
            source: Some(Box::new(e)),
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }
}

impl Default for StandardPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StandardPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardPreprocessor")
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}

impl Preprocessor for StandardPreprocessor {
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        let key = self
            .pattern
            .replace_all(key, regex_lite::NoExpand(&self.replacement))
            .to_uppercase();
        (key, value)
    }
}

/// Casts string values to booleans, numbers and null.
///
/// Only string values are examined, case-insensitively:
///
/// - `yes`, `y`, `t`, `true`, `+`, `enable`, `enabled`, `on` become `true`
/// - `no`, `n`, `f`, `false`, `-`, `disable`, `disabled`, `off` become `false`
/// - `null`, `none`, `nil` and the empty string become `Null`
/// - signed decimal integers become integers (unless they overflow `i64`)
/// - signed decimals with exactly one `.` become floats
///
/// Anything else is left unchanged. Keys pass through.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::CastingPreprocessor;
/// use cfghub::domain::ConfigValue;
/// use cfghub::ports::Preprocessor;
///
/// let caster = CastingPreprocessor::new();
/// assert_eq!(caster.process("k", "Enabled".into()).1, true);
/// assert_eq!(caster.process("k", "-12".into()).1, -12);
/// assert_eq!(caster.process("k", "3.14".into()).1, 3.14);
/// assert_eq!(caster.process("k", "None".into()).1, ConfigValue::Null);
/// assert_eq!(caster.process("k", "1.2.3".into()).1, "1.2.3");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CastingPreprocessor;

impl CastingPreprocessor {
    /// Creates a casting preprocessor.
    pub fn new() -> Self {
        CastingPreprocessor
    }

    /// Casts a single string.
    pub fn cast(text: &str) -> Option<ConfigValue> {
        let lowered = text.to_lowercase();
        let lowered = lowered.as_str();

        if TRUE_TOKENS.contains(&lowered) {
            return Some(ConfigValue::Bool(true));
        }
        if FALSE_TOKENS.contains(&lowered) {
            return Some(ConfigValue::Bool(false));
        }
        if NULL_TOKENS.contains(&lowered) {
            return Some(ConfigValue::Null);
        }

        if INTEGER_PATTERN.is_match(lowered) {
            return lowered.parse::<i64>().ok().map(ConfigValue::Integer);
        }
        if FLOAT_PATTERN.is_match(lowered) && lowered.matches('.').count() == 1 {
            return lowered.parse::<f64>().ok().map(ConfigValue::Float);
        }

        None
    }
}

impl Preprocessor for CastingPreprocessor {
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        let value = match value {
            ConfigValue::String(text) => Self::cast(&text).unwrap_or(ConfigValue::String(text)),
            other => other,
        };
        (key.to_string(), value)
    }
}

/// Renames keys through a fixed table. Unlisted keys and all values pass through.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::RenamePreprocessor;
/// use cfghub::ports::Preprocessor;
///
/// let rename = RenamePreprocessor::new([("db_host", "DATABASE_HOST")]);
/// assert_eq!(rename.process_key("db_host"), "DATABASE_HOST");
/// assert_eq!(rename.process_key("port"), "port");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenamePreprocessor {
    table: IndexMap<String, String>,
}

impl RenamePreprocessor {
    /// Creates a rename preprocessor from `(old, new)` pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Preprocessor for RenamePreprocessor {
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        let key = self
            .table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string());
        (key, value)
    }
}

/// Runs several preprocessors left to right.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::{ChainPreprocessor, RenamePreprocessor, StandardPreprocessor};
/// use cfghub::ports::Preprocessor;
///
/// let chain = ChainPreprocessor::new()
///     .then(RenamePreprocessor::new([("host", "db host")]))
///     .then(StandardPreprocessor::new());
/// assert_eq!(chain.process_key("host"), "DB_HOST");
/// ```
#[derive(Clone, Default)]
pub struct ChainPreprocessor {
    steps: Vec<Arc<dyn Preprocessor>>,
}

impl ChainPreprocessor {
    /// Creates an empty chain, which behaves like [`IdentityPreprocessor`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn then(mut self, step: impl Preprocessor + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for ChainPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainPreprocessor")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl Preprocessor for ChainPreprocessor {
    fn process(&self, key: &str, value: ConfigValue) -> (String, ConfigValue) {
        self.steps
            .iter()
            .fold((key.to_string(), value), |(key, value), step| {
                step.process(&key, value)
            })
    }
}

/// Returns the usual chain: standard key normalization followed by value casting.
pub fn standard_with_casting() -> ChainPreprocessor {
    ChainPreprocessor::new()
        .then(StandardPreprocessor::new())
        .then(CastingPreprocessor::new())
}
