// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur while aggregating configuration
//! into a store. All errors use `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum represents all possible errors that can occur when aggregating, merging,
/// decoding, or accessing configuration values. It is marked as `#[non_exhaustive]` to
/// allow for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use cfghub::domain::errors::ConfigError;
///
/// fn read_only_operation() -> Result<(), ConfigError> {
///     Err(ConfigError::NotPermitted {
///         operation: "clear".to_string(),
///     })
/// }
///
/// assert!(read_only_operation().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A source value has a shape the store cannot aggregate.
    #[error("Unsupported data-type: {type_name}. Only mappings, stores, environment, argument namespaces and enum defaults are supported")]
    UnsupportedType {
        /// Name of the offending value type
        type_name: String,
    },

    /// The file handler chain is empty.
    #[error("No file handlers specified")]
    NoAvailableHandlers,

    /// No file handler recognized the given file.
    #[error("No handler for {file} is found")]
    NoHandler {
        /// The file that could not be handled
        file: String,
    },

    /// A recognized file or stream is structurally invalid for its format.
    #[error("Wrong {format} format: {message}")]
    WrongFormat {
        /// The format name (e.g. "JSON")
        format: String,
        /// Description of the problem
        message: String,
    },

    /// A key outside of the initially learned key set was used on a strict store.
    #[error("Strict Keys mode enabled. Only initial set of keys allowed. Key \"{key}\" is unknown")]
    StrictKeysViolation {
        /// The normalized key that was rejected
        key: String,
    },

    /// The operation is never allowed on a store.
    #[error("Operation '{operation}' on ConfigStore is not permitted due to architecture")]
    NotPermitted {
        /// The rejected operation
        operation: String,
    },

    /// The requested configuration key was not found in the store.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A value constructor could not build a typed value.
    #[error("Failed to construct value of type '{type_name}': {message}")]
    ValueConstruction {
        /// The declared type tag
        type_name: String,
        /// Description of the problem
        message: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `StrictKeysViolation` for the given key.
    pub fn strict_keys(key: impl Into<String>) -> Self {
        ConfigError::StrictKeysViolation { key: key.into() }
    }

    /// Creates a `NotPermitted` error for the given operation.
    pub fn not_permitted(operation: impl Into<String>) -> Self {
        ConfigError::NotPermitted {
            operation: operation.into(),
        }
    }

    /// Creates a `WrongFormat` error.
    pub fn wrong_format(format: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::WrongFormat {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates a `TypeConversionError` from a serde deserialization failure.
    pub fn from_deserialize_error<T>(key: &str, err: serde_json::Error) -> Self {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: std::any::type_name::<T>().to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
