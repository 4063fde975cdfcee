// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types and logic for the configuration crate:
//! values, provenance records, source shapes, enumerated defaults and the store that
//! aggregates them. It depends only on the ports it is parameterized with.

pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod record;
pub mod schema;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::{ConfigMap, ConfigValue, TypedObject};
pub use errors::{ConfigError, Result};
pub use record::{AppliedConf, Origin, SourceKind, SourceMeta};
pub use schema::{ConfigEnum, ConfigSchema, SchemaEntry};
pub use source::ConfigSource;
pub use store::{ConfigStore, ConfigStoreBuilder};
