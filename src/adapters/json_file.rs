// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file handler.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result, SourceKind};
use crate::ports::FileHandler;

/// File handler for `.json` files.
///
/// The root element must be an object.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::JsonFileHandler;
/// use cfghub::ports::FileHandler;
///
/// let handler = JsonFileHandler::new();
/// let result = handler.parse(r#"{"name": "demo", "ports": [80, 443]}"#).unwrap();
/// assert_eq!(result["name"], "demo");
///
/// assert!(handler.parse("[1, 2, 3]").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonFileHandler;

impl JsonFileHandler {
    /// Creates a new JSON handler.
    pub fn new() -> Self {
        JsonFileHandler
    }
}

impl FileHandler for JsonFileHandler {
    fn name(&self) -> &str {
        "JSON"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Json
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;

        match ConfigValue::from(value) {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(ConfigError::wrong_format(
                "JSON",
                format!("root element must be an object, found {}", other.type_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_handler_nested() {
        let result = JsonFileHandler::new()
            .parse(r#"{"db": {"host": "localhost", "port": 5432}, "debug": false}"#)
            .unwrap();
        let db = result["db"].as_mapping().unwrap();
        assert_eq!(db["host"], "localhost");
        assert_eq!(db["port"], 5432);
        assert_eq!(result["debug"], false);
    }

    #[test]
    fn test_json_handler_preserves_key_order() {
        let result = JsonFileHandler::new()
            .parse(r#"{"z": 1, "a": 2, "m": 3}"#)
            .unwrap();
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_json_handler_rejects_non_object_root() {
        let err = JsonFileHandler::new().parse("42").unwrap_err();
        assert!(matches!(err, ConfigError::WrongFormat { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn test_json_handler_invalid() {
        let result = JsonFileHandler::new().parse("{not json");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_json_handler_stream() {
        let store = JsonFileHandler::new()
            .process_stream(&mut r#"{"a": 1}"#.as_bytes(), "&[u8]")
            .unwrap();
        assert_eq!(store.kind(), &SourceKind::Io);
        assert_eq!(store.handler(), Some("JSON"));
        assert_eq!(store.value("a").unwrap(), Some(&ConfigValue::from(1)));
    }
}
