// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file handler.
//!
//! This module provides a handler that decodes YAML files and streams into stores,
//! keeping nested mappings and sequences intact for the merge strategies.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result, SourceKind};
use crate::ports::FileHandler;

/// File handler for `.yaml` and `.yml` files.
///
/// An empty document decodes to an empty mapping. Any other root that is not a mapping
/// is rejected. Dispatch is by extension only, so JSON files are never decoded as YAML.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::YamlFileHandler;
/// use cfghub::ports::FileHandler;
///
/// let handler = YamlFileHandler::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = handler.parse(yaml_content).unwrap();
/// let database = result["database"].as_mapping().unwrap();
/// assert_eq!(database["host"], "localhost");
/// assert_eq!(database["port"], 5432);
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlFileHandler;

impl YamlFileHandler {
    /// Creates a new YAML handler.
    pub fn new() -> Self {
        YamlFileHandler
    }
}

impl FileHandler for YamlFileHandler {
    fn name(&self) -> &str {
        "YAML"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Yaml
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match ConfigValue::from(value) {
            ConfigValue::Mapping(map) => Ok(map),
            ConfigValue::Null => Ok(ConfigMap::new()),
            other => Err(ConfigError::wrong_format(
                "YAML",
                format!("root element must be a mapping, found {}", other.type_name()),
            )),
        }
    }
}
