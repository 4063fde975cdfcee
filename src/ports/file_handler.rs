// SPDX-License-Identifier: MIT OR Apache-2.0

//! File handler trait definition.
//!
//! This module defines the `FileHandler` trait, which provides an interface for
//! decoding configuration files and streams in different formats (JSON, YAML, dotenv,
//! etc.) into stores tagged with their provenance.

use crate::domain::{ConfigError, ConfigMap, ConfigSource, ConfigStore, Origin, Result, SourceKind};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Maximum configuration file size (10 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A trait for decoding configuration files.
///
/// Implementors only provide the format specific pieces: a name, a source kind, the
/// supported file extensions and a `parse` function turning text into a mapping. File
/// and stream processing are provided.
///
/// # Examples
///
/// ```rust
/// use cfghub::ports::FileHandler;
/// use cfghub::domain::{ConfigMap, ConfigValue, Result, SourceKind};
///
/// struct KeyValueHandler;
///
/// impl FileHandler for KeyValueHandler {
///     fn name(&self) -> &str {
///         "kv"
///     }
///
///     fn kind(&self) -> SourceKind {
///         SourceKind::Custom("KV".into())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
///
///     fn parse(&self, content: &str) -> Result<ConfigMap> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once(' '))
///             .map(|(k, v)| (k.to_string(), ConfigValue::from(v)))
///             .collect())
///     }
/// }
///
/// let handler = KeyValueHandler;
/// assert!(handler.handles(std::path::Path::new("app.kv")));
/// let store = handler.process_stream(&mut "name demo".as_bytes(), "bytes").unwrap();
/// assert_eq!(store.value("name").unwrap(), Some(&ConfigValue::from("demo")));
/// ```
pub trait FileHandler: Send + Sync {
    /// Returns the handler name recorded in provenance.
    fn name(&self) -> &str;

    /// Returns the source kind of stores produced by this handler.
    fn kind(&self) -> SourceKind;

    /// Returns the file extensions (without the leading dot) this handler recognizes.
    fn supported_extensions(&self) -> &[&str];

    /// Decodes content into a mapping.
    ///
    /// Content whose root is not a mapping must be rejected with
    /// [`ConfigError::WrongFormat`].
    fn parse(&self, content: &str) -> Result<ConfigMap>;

    /// Returns `true` if the path carries a supported extension, or is a dotfile named
    /// after one (e.g. `.env`).
    fn handles(&self, path: &Path) -> bool {
        let extension = path.extension().and_then(|e| e.to_str());
        let file_name = path.file_name().and_then(|n| n.to_str());

        self.supported_extensions().iter().any(|supported| {
            extension.is_some_and(|e| e.eq_ignore_ascii_case(supported))
                || file_name.is_some_and(|n| {
                    n.strip_prefix('.')
                        .is_some_and(|n| n.eq_ignore_ascii_case(supported))
                })
        })
    }

    /// Decodes a file into a store.
    ///
    /// Returns `Ok(None)` when the file is not recognized by extension, cannot be read,
    /// or fails to decode, so that the next handler in a chain can try it.
    fn process_path(&self, path: &Path) -> Result<Option<ConfigStore>> {
        if !self.handles(path) {
            tracing::trace!("Handler {} skips {}", self.name(), path.display());
            return Ok(None);
        }

        let (canonical, content) = match read_config_file(path) {
            Ok(read) => read,
            Err(e) => {
                tracing::debug!("Handler {} could not read {}: {}", self.name(), path.display(), e);
                return Ok(None);
            }
        };

        let data = match self.parse(&content) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Handler {} failed to decode {}: {}", self.name(), canonical.display(), e);
                return Ok(None);
            }
        };

        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string());

        ConfigStore::builder()
            .name(name)
            .origin(Origin::Path(canonical))
            .kind(self.kind())
            .handler(self.name())
            .initial(ConfigSource::Mapping(data))
            .build()
            .map(Some)
    }

    /// Decodes a stream into a store.
    ///
    /// The stream is read to its end. Errors are returned to the caller since there is
    /// no other handler to fall back to.
    fn process_stream(&self, reader: &mut dyn Read, stream_name: &str) -> Result<ConfigStore> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let data = self.parse(&content)?;

        ConfigStore::builder()
            .name(stream_name)
            .origin(Origin::Object(stream_name.to_string()))
            .kind(SourceKind::Io)
            .handler(self.name())
            .initial(ConfigSource::Mapping(data))
            .build()
    }
}

/// Reads a configuration file, guarding against oversized input.
///
/// Returns the canonical path together with the file content.
pub fn read_config_file(path: &Path) -> Result<(PathBuf, String)> {
    // Canonicalize the path to prevent path traversal attacks
    let canonical = path.canonicalize()?;

    let metadata = std::fs::metadata(&canonical)?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: canonical.display().to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
            source: None,
        });
    }

    let content = std::fs::read_to_string(&canonical)?;
    Ok((canonical, content))
}
