// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture configuration aggregation crate.
//!
//! This crate collects key/value settings from heterogeneous sources (in-memory
//! mappings, JSON, YAML and dotenv files, the process environment, command-line argument
//! namespaces and conditional callables), normalizes keys, casts values and merges them
//! into a single ordered store that remembers which source set every key.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and the store (`ConfigValue`, `ConfigSource`, `ConfigStore`, errors)
//! - **Ports**: Trait definitions for every pipeline seam (`Preprocessor`, `Filter`, `MergeStrategy`, `FileHandler`)
//! - **Adapters**: Stock preprocessors, filters, strategies, file handlers and sources
//! - **Service**: The hub that folds an ordered list of inputs into one store
//!
//! # Features
//!
//! - **Multiple Sources**: Mappings, files, streams, environment variables, CLI arguments
//! - **Normalization**: Pluggable key normalization and string-to-value casting
//! - **Merging**: Flat override or recursive structural merge
//! - **Provenance**: Every applied source is recorded and can be queried per key
//! - **Typed Defaults**: Enumerated defaults with declared value types
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `dotenv`: Enable dotenv file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument support (default)
//! - `full`: Enable all features
//!
//! JSON support is always available.
//!
//! # Quick Start
//!
//! ```rust
//! use cfghub::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let defaults = ConfigSchema::new("Defaults")
//!     .entry("name", "unknown")
//!     .typed_entry("age", 0, "int")
//!     .entry("country", "none");
//!
//! let mut target = ConfigStore::builder()
//!     .initial(defaults)
//!     .preprocessor(StandardPreprocessor::new())
//!     .none_considered_empty(true)
//!     .build()?;
//!
//! let mut args = ConfigMap::new();
//! args.insert("name".into(), "Ivan".into());
//! args.insert("age".into(), "34".into());
//! args.insert("country".into(), ConfigValue::Null);
//! target.update(args)?;
//!
//! assert_eq!(target.get("age")?, Some(&ConfigValue::from(34)));
//! assert_eq!(target.get("country")?, Some(&ConfigValue::from("none")));
//! assert_eq!(target.applied_from("age").map(|r| r.kind.as_str()), Some("dict"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        AppliedConf, ConfigEnum, ConfigError, ConfigKey, ConfigMap, ConfigSchema, ConfigSource,
        ConfigStore, ConfigValue, Origin, Result, SourceKind, SourceMeta,
    };
    pub use crate::ports::{Conditional, FileHandler, Filter, MergeStrategy, Preprocessor};
    pub use crate::service::{ConfigHub, Input};

    pub use crate::adapters::{
        CastingPreprocessor, FlatStrategy, JsonFileHandler, RecursiveStrategy,
        StandardPreprocessor,
    };

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::ArgNamespace;
    #[cfg(feature = "dotenv")]
    pub use crate::adapters::DotEnvFileHandler;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlFileHandler;
}
