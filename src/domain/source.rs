// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source shapes accepted by a store.
//!
//! Every input that a [`ConfigStore`] can aggregate is one of the variants of
//! [`ConfigSource`]. Each variant knows how to turn itself into a plain mapping together
//! with default provenance metadata, so the apply pipeline only ever sees mappings.

use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ConfigError, Result};
use crate::domain::record::{Origin, SourceKind, SourceMeta};
use crate::domain::schema::{ConfigEnum, ConfigSchema};
use crate::domain::store::ConfigStore;

/// A configuration source.
///
/// # Examples
///
/// ```
/// use cfghub::domain::{ConfigMap, ConfigSource, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// map.insert("port".into(), ConfigValue::from(8080));
/// let source = ConfigSource::from(map);
/// assert!(!source.is_empty());
///
/// let source = ConfigSource::try_from(ConfigValue::Null).unwrap();
/// assert!(source.is_empty());
///
/// assert!(ConfigSource::try_from(ConfigValue::from(5)).is_err());
/// ```
#[derive(Clone, Debug)]
pub enum ConfigSource {
    /// A plain mapping
    Mapping(ConfigMap),
    /// A snapshot of environment variables
    Environment(ConfigMap),
    /// Parsed command-line arguments
    Namespace {
        /// Argument values by destination name
        values: ConfigMap,
        /// Description of the parser that produced the values
        description: String,
    },
    /// Another store
    Store(ConfigStore),
    /// Enumerated defaults
    EnumDefaults(ConfigSchema),
}

/// A source decomposed into the pieces the apply pipeline needs.
pub(crate) struct Classified {
    pub(crate) data: ConfigMap,
    pub(crate) meta: SourceMeta,
    pub(crate) schema: Option<ConfigSchema>,
}

impl ConfigSource {
    /// Creates a source from the enumerated defaults of `E`.
    pub fn from_enum<E: ConfigEnum>() -> Self {
        ConfigSource::EnumDefaults(E::schema())
    }

    /// Returns `true` if the source carries no pairs.
    pub fn is_empty(&self) -> bool {
        match self {
            ConfigSource::Mapping(map) | ConfigSource::Environment(map) => map.is_empty(),
            ConfigSource::Namespace { values, .. } => values.is_empty(),
            ConfigSource::Store(store) => store.is_empty(),
            ConfigSource::EnumDefaults(schema) => schema.is_empty(),
        }
    }

    /// Iterates over the raw keys the source will contribute.
    pub fn raw_keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            ConfigSource::Mapping(map) | ConfigSource::Environment(map) => {
                Box::new(map.keys().map(String::as_str))
            }
            ConfigSource::Namespace { values, .. } => Box::new(values.keys().map(String::as_str)),
            ConfigSource::Store(store) => Box::new(store.keys().map(|k| k.as_str())),
            ConfigSource::EnumDefaults(schema) => {
                Box::new(schema.entries().iter().map(|e| e.key.as_str()))
            }
        }
    }

    /// Splits the source into a mapping and default metadata.
    ///
    /// Explicit metadata always wins over the defaults of the source shape, except for
    /// enumerated defaults, which are always attributed to their schema.
    pub(crate) fn classify(self, explicit: SourceMeta) -> Classified {
        match self {
            ConfigSource::Mapping(data) => Classified {
                data,
                meta: explicit.or(SourceMeta::new().kind(SourceKind::Dict)),
                schema: None,
            },
            ConfigSource::Environment(data) => Classified {
                data,
                meta: explicit.or(
                    SourceMeta::new()
                        .name("environ")
                        .origin(Origin::Object("os".into()))
                        .kind(SourceKind::Environment),
                ),
                schema: None,
            },
            ConfigSource::Namespace {
                values,
                description,
            } => Classified {
                data: values,
                meta: explicit.or(
                    SourceMeta::new()
                        .name("args")
                        .origin(Origin::Object(description))
                        .kind(SourceKind::ArgumentNamespace),
                ),
                schema: None,
            },
            ConfigSource::Store(store) => {
                let mut inherited = SourceMeta::new().kind(store.kind().clone());
                inherited.name = store.name().map(str::to_string);
                inherited.origin = store.origin().cloned();
                inherited.handler = store.handler().map(str::to_string);
                Classified {
                    data: store.to_map(),
                    meta: explicit.or(inherited),
                    schema: None,
                }
            }
            ConfigSource::EnumDefaults(schema) => {
                let meta = SourceMeta {
                    name: Some(schema.name().to_string()),
                    origin: Some(Origin::Object(schema.name().to_string())),
                    kind: Some(SourceKind::Enum),
                    handler: explicit.handler,
                };
                Classified {
                    data: schema.defaults(),
                    meta,
                    schema: Some(schema),
                }
            }
        }
    }
}

impl From<ConfigMap> for ConfigSource {
    fn from(map: ConfigMap) -> Self {
        ConfigSource::Mapping(map)
    }
}

impl From<ConfigStore> for ConfigSource {
    fn from(store: ConfigStore) -> Self {
        ConfigSource::Store(store)
    }
}

impl From<ConfigSchema> for ConfigSource {
    fn from(schema: ConfigSchema) -> Self {
        ConfigSource::EnumDefaults(schema)
    }
}

impl TryFrom<ConfigValue> for ConfigSource {
    type Error = ConfigError;

    fn try_from(value: ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Mapping(map) => Ok(ConfigSource::Mapping(map)),
            ConfigValue::Object(obj) => Ok(ConfigSource::Mapping(obj.into_parts().1)),
            ConfigValue::Null => Ok(ConfigSource::Mapping(ConfigMap::new())),
            other => Err(ConfigError::UnsupportedType {
                type_name: other.type_name().to_string(),
            }),
        }
    }
}
