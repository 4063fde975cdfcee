// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provenance records for applied configuration.
//!
//! Every successful application of a source onto a store appends one [`AppliedConf`]
//! to the store's history. Records are immutable and are used to answer "where did this
//! key come from?".

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Kind tag of a configuration source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A plain in-memory mapping
    Dict,
    /// Process environment variables
    Environment,
    /// Parsed command-line arguments
    ArgumentNamespace,
    /// A single `set` call
    SingleValue,
    /// An arbitrary byte stream
    Io,
    /// A YAML file
    Yaml,
    /// A JSON file
    Json,
    /// A dotenv file
    DotEnv,
    /// Enumerated defaults
    Enum,
    /// Another configuration store
    Store,
    /// User defined kind
    Custom(String),
}

impl SourceKind {
    /// Returns the textual tag of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            SourceKind::Dict => "dict",
            SourceKind::Environment => "EnvVars",
            SourceKind::ArgumentNamespace => "argparser",
            SourceKind::SingleValue => "single-value",
            SourceKind::Io => "IO",
            SourceKind::Yaml => "YAML",
            SourceKind::Json => "JSON",
            SourceKind::DotEnv => "DotEnv",
            SourceKind::Enum => "enum",
            SourceKind::Store => "ConfigStore",
            SourceKind::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a configuration came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// A filesystem path
    Path(PathBuf),
    /// A source code location (used by `set`)
    Location {
        /// Source file
        file: String,
        /// Line number
        line: u32,
        /// Column number
        column: u32,
    },
    /// A described in-process object (environment, namespace, ...)
    Object(String),
    /// Free-form description
    Text(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Path(path) => write!(f, "{}", path.display()),
            Origin::Location { file, line, column } => write!(f, "{}:{}:{}", file, line, column),
            Origin::Object(desc) | Origin::Text(desc) => f.write_str(desc),
        }
    }
}

/// Metadata attached to a source when it is applied.
///
/// Missing fields are filled with defaults derived from the source shape.
///
/// # Examples
///
/// ```
/// use cfghub::domain::{Origin, SourceKind, SourceMeta};
///
/// let meta = SourceMeta::new()
///     .name("overrides")
///     .kind(SourceKind::Dict)
///     .origin(Origin::Text("inline".into()));
/// assert_eq!(meta.name.as_deref(), Some("overrides"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMeta {
    /// Source name
    pub name: Option<String>,
    /// Source origin
    pub origin: Option<Origin>,
    /// Source kind
    pub kind: Option<SourceKind>,
    /// Handler that produced the source
    pub handler: Option<String>,
}

impl SourceMeta {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the origin.
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Sets the kind.
    pub fn kind(mut self, kind: SourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the handler name.
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Fills every unset field from `defaults`.
    pub fn or(self, defaults: SourceMeta) -> Self {
        Self {
            name: self.name.or(defaults.name),
            origin: self.origin.or(defaults.origin),
            kind: self.kind.or(defaults.kind),
            handler: self.handler.or(defaults.handler),
        }
    }
}

/// One applied source in a store's history.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedConf {
    /// Normalized keys that the source actually set
    pub applied_keys: Vec<ConfigKey>,
    /// Kind tag
    pub kind: SourceKind,
    /// Source name
    pub name: Option<String>,
    /// Source origin
    pub origin: Option<Origin>,
    /// Handler that produced the data, if any
    pub handler: Option<String>,
    /// The raw mapping that was applied, before preprocessing
    pub payload: Arc<ConfigMap>,
}

impl AppliedConf {
    /// Returns `true` if this record set the given normalized key.
    pub fn sets(&self, key: &str) -> bool {
        self.applied_keys.iter().any(|k| k == key)
    }

    /// Returns `true` if the raw payload contains the given unprocessed key.
    pub fn carries_raw(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }
}

impl fmt::Display for AppliedConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if let Some(origin) = &self.origin {
            write!(f, " ({})", origin)?;
        }
        write!(f, " keys={}", self.applied_keys.len())
    }
}
