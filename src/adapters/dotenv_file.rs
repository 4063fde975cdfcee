// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotenv file handler.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result, SourceKind};
use crate::ports::FileHandler;

/// File handler for `.env` files, including files named just `.env`.
///
/// Values are read as strings and the process environment is not modified.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::DotEnvFileHandler;
/// use cfghub::ports::FileHandler;
///
/// let handler = DotEnvFileHandler::new();
/// let result = handler.parse("# comment\nAPP_NAME=demo\nPORT=8080\n").unwrap();
/// assert_eq!(result["APP_NAME"], "demo");
/// assert_eq!(result["PORT"], "8080");
///
/// assert!(handler.handles(std::path::Path::new("/srv/app/.env")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DotEnvFileHandler;

impl DotEnvFileHandler {
    /// Creates a new dotenv handler.
    pub fn new() -> Self {
        DotEnvFileHandler
    }
}

impl FileHandler for DotEnvFileHandler {
    fn name(&self) -> &str {
        "DotEnv"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::DotEnv
    }

    fn supported_extensions(&self) -> &[&str] {
        &["env"]
    }

    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let mut map = ConfigMap::new();
        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = item.map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse dotenv: {}", e),
                source: Some(Box::new(e)),
            })?;
            map.insert(key, ConfigValue::from(value));
        }
        Ok(map)
    }
}
