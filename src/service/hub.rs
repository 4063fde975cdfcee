// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration hub.
//!
//! This module provides [`ConfigHub`], which folds an ordered list of heterogeneous
//! inputs into a single [`ConfigStore`]. Later inputs take precedence over earlier ones
//! according to the target store's merge strategy.

use crate::adapters::JsonFileHandler;
use crate::domain::{ConfigError, ConfigMap, ConfigSource, ConfigStore, ConfigValue, Result, SourceMeta};
use crate::ports::{Conditional, FileHandler};
use directories::ProjectDirs;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One item of an aggregation.
///
/// # Examples
///
/// ```rust
/// use cfghub::service::Input;
/// use cfghub::domain::{ConfigMap, ConfigValue};
/// use std::path::Path;
///
/// let mut defaults = ConfigMap::new();
/// defaults.insert("PORT".into(), ConfigValue::from(8080));
///
/// let inputs: Vec<Input> = vec![
///     defaults.into(),
///     Path::new("/etc/app/config.yaml").into(),
///     ConfigValue::Null.into(),
/// ];
/// assert_eq!(inputs.len(), 3);
/// ```
pub enum Input {
    /// A file, decoded by the first handler in the chain that recognizes it
    Path(PathBuf),
    /// A stream, decoded by an explicit handler
    Stream {
        /// The stream, read to its end
        reader: Box<dyn Read>,
        /// Name recorded as the stream's origin
        name: String,
        /// The handler that decodes the stream
        handler: Arc<dyn FileHandler>,
    },
    /// An in-memory source
    Source(ConfigSource),
    /// A dynamic value, which must be a mapping, an object or null
    Value(ConfigValue),
    /// A callable that sees the store built so far
    Conditional(Box<dyn Conditional>),
}

impl Input {
    /// Creates a path input.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Input::Path(path.into())
    }

    /// Creates a stream input named after the reader's type.
    pub fn stream<R>(reader: R, handler: impl FileHandler + 'static) -> Self
    where
        R: Read + 'static,
    {
        Input::Stream {
            reader: Box::new(reader),
            name: std::any::type_name::<R>().to_string(),
            handler: Arc::new(handler),
        }
    }

    /// Creates a conditional input.
    pub fn conditional(conditional: impl Conditional + 'static) -> Self {
        Input::Conditional(Box::new(conditional))
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Input::Stream { name, handler, .. } => f
                .debug_struct("Stream")
                .field("name", name)
                .field("handler", &handler.name())
                .finish(),
            Input::Source(source) => f.debug_tuple("Source").field(source).finish(),
            Input::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Input::Conditional(_) => f.write_str("Conditional"),
        }
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::Path(path)
    }
}

impl From<&Path> for Input {
    fn from(path: &Path) -> Self {
        Input::Path(path.to_path_buf())
    }
}

impl From<ConfigSource> for Input {
    fn from(source: ConfigSource) -> Self {
        Input::Source(source)
    }
}

impl From<ConfigMap> for Input {
    fn from(map: ConfigMap) -> Self {
        Input::Source(ConfigSource::Mapping(map))
    }
}

impl From<ConfigStore> for Input {
    fn from(store: ConfigStore) -> Self {
        Input::Source(ConfigSource::Store(store))
    }
}

impl From<ConfigValue> for Input {
    fn from(value: ConfigValue) -> Self {
        Input::Value(value)
    }
}

/// Aggregates configuration from files, streams and in-memory sources.
///
/// A hub owns its file handler chain. Handlers are tried in order and the first one
/// that decodes a file wins. The default chain is JSON, then YAML, then dotenv.
///
/// # Examples
///
/// ```rust
/// use cfghub::service::{ConfigHub, Input};
/// use cfghub::domain::{ConfigMap, ConfigValue};
///
/// # fn main() -> cfghub::domain::Result<()> {
/// let mut defaults = ConfigMap::new();
/// defaults.insert("HOST".into(), ConfigValue::from("localhost"));
/// defaults.insert("PORT".into(), ConfigValue::from(8080));
///
/// let mut overrides = ConfigMap::new();
/// overrides.insert("PORT".into(), ConfigValue::from(9090));
///
/// let store = ConfigHub::new().aggregate(vec![Input::from(defaults), overrides.into()])?;
///
/// assert_eq!(store.get("PORT")?, Some(&ConfigValue::from(9090)));
/// assert_eq!(store.applied_from("HOST").unwrap().kind.as_str(), "dict");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigHub {
    handlers: Vec<Arc<dyn FileHandler>>,
    skip_files_with_missing_handler: bool,
}

impl ConfigHub {
    /// Creates a hub with the default handler chain.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a hub builder.
    pub fn builder() -> ConfigHubBuilder {
        ConfigHubBuilder::new()
    }

    /// Returns the handler chain in priority order.
    pub fn handlers(&self) -> &[Arc<dyn FileHandler>] {
        &self.handlers
    }

    /// Returns whether files no handler recognizes are skipped silently.
    pub fn skip_files_with_missing_handler(&self) -> bool {
        self.skip_files_with_missing_handler
    }

    /// Aggregates `inputs` into a new default store.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an input. See [`ConfigHub::aggregate_into`].
    pub fn aggregate<I>(&self, inputs: I) -> Result<ConfigStore>
    where
        I: IntoIterator,
        I::Item: Into<Input>,
    {
        self.aggregate_into(inputs, ConfigStore::new())
    }

    /// Aggregates `inputs` into `target`, in order.
    ///
    /// Every input goes through [`ConfigStore::update`], so strict keys are enforced
    /// for all of them.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnsupportedType`] for a dynamic value that is not a mapping
    /// - [`ConfigError::NoHandler`] for an unrecognized file when skipping is disabled
    /// - any decode error of a stream
    /// - any error raised by the target store or by a conditional
    pub fn aggregate_into<I>(&self, inputs: I, mut target: ConfigStore) -> Result<ConfigStore>
    where
        I: IntoIterator,
        I::Item: Into<Input>,
    {
        for input in inputs {
            let input: Input = input.into();
            match input {
                Input::Path(path) => {
                    if let Some(store) = self.config_from_file(&path, None)? {
                        target.update(store)?;
                    }
                }
                Input::Stream {
                    mut reader,
                    name,
                    handler,
                } => {
                    let store = self.config_from_stream(reader.as_mut(), &name, handler.as_ref())?;
                    target.update(store)?;
                }
                Input::Source(source) => {
                    target.update(source)?;
                }
                Input::Value(value) => {
                    target.update(ConfigSource::try_from(value)?)?;
                }
                Input::Conditional(conditional) => {
                    match conditional.condition(&target)? {
                        Some(data) if !data.is_empty() => {
                            target.update(data)?;
                        }
                        _ => tracing::trace!("Conditional contributed nothing"),
                    }
                }
            }
        }
        Ok(target)
    }

    /// Decodes a file into a store.
    ///
    /// With an explicit `handler`, only that handler is tried. Otherwise the chain is
    /// tried in order. Returns `Ok(None)` when nothing decoded the file and skipping is
    /// enabled.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoAvailableHandlers`] if the chain is empty and no handler was given
    /// - [`ConfigError::NoHandler`] if nothing decoded the file and skipping is disabled
    pub fn config_from_file(
        &self,
        path: &Path,
        handler: Option<&dyn FileHandler>,
    ) -> Result<Option<ConfigStore>> {
        let candidates: Vec<&dyn FileHandler> = match handler {
            Some(handler) => vec![handler],
            None => self.handlers.iter().map(|h| h.as_ref()).collect(),
        };

        if candidates.is_empty() {
            return Err(ConfigError::NoAvailableHandlers);
        }

        for candidate in candidates {
            if let Some(store) = candidate.process_path(path)? {
                tracing::debug!("Loaded {} with handler {}", path.display(), candidate.name());
                return Ok(Some(store));
            }
        }

        if !self.skip_files_with_missing_handler {
            return Err(ConfigError::NoHandler {
                file: path.display().to_string(),
            });
        }

        tracing::debug!("No handler for {}, skipping", path.display());
        Ok(None)
    }

    /// Decodes a stream into a store with an explicit handler.
    ///
    /// # Errors
    ///
    /// Returns read and decode errors of the stream.
    pub fn config_from_stream(
        &self,
        reader: &mut dyn Read,
        stream_name: &str,
        handler: &dyn FileHandler,
    ) -> Result<ConfigStore> {
        handler.process_stream(reader, stream_name)
    }

    /// Builds a standalone store from an in-memory source.
    ///
    /// Fields of `meta` override the defaults derived from the source shape.
    pub fn config_from_dict(
        &self,
        source: impl Into<ConfigSource>,
        meta: SourceMeta,
    ) -> Result<ConfigStore> {
        ConfigStore::builder().meta(meta).initial(source).build()
    }

    /// Returns the OS-specific location of a configuration file.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `file_name` - The configuration file name (e.g., "config.yaml")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfghub::service::ConfigHub;
    ///
    /// let path = ConfigHub::default_config_path("myapp", "com.example", "config.yaml").unwrap();
    /// assert!(path.ends_with("config.yaml"));
    /// ```
    pub fn default_config_path(app_name: &str, qualifier: &str, file_name: &str) -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: app_name.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(proj_dirs.config_dir().join(file_name))
    }
}

impl Default for ConfigHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("ConfigHub")
            .field("handlers", &names)
            .field(
                "skip_files_with_missing_handler",
                &self.skip_files_with_missing_handler,
            )
            .finish()
    }
}

/// Builder for [`ConfigHub`].
///
/// # Examples
///
/// ```rust
/// use cfghub::service::ConfigHubBuilder;
/// use cfghub::adapters::JsonFileHandler;
///
/// let hub = ConfigHubBuilder::new()
///     .without_handlers()
///     .with_handler(JsonFileHandler::new())
///     .skip_files_with_missing_handler(false)
///     .build();
///
/// assert_eq!(hub.handlers().len(), 1);
/// ```
pub struct ConfigHubBuilder {
    handlers: Vec<Arc<dyn FileHandler>>,
    skip_files_with_missing_handler: bool,
}

impl ConfigHubBuilder {
    /// Creates a builder with the default handler chain.
    pub fn new() -> Self {
        Self {
            handlers: default_handlers(),
            skip_files_with_missing_handler: true,
        }
    }

    /// Appends a handler to the chain.
    pub fn with_handler(mut self, handler: impl FileHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends several shared handlers to the chain.
    pub fn with_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn FileHandler>>,
    {
        self.handlers.extend(handlers);
        self
    }

    /// Empties the chain.
    pub fn without_handlers(mut self) -> Self {
        self.handlers.clear();
        self
    }

    /// Sets whether unrecognized files are skipped instead of failing.
    pub fn skip_files_with_missing_handler(mut self, enabled: bool) -> Self {
        self.skip_files_with_missing_handler = enabled;
        self
    }

    /// Builds the hub.
    pub fn build(self) -> ConfigHub {
        ConfigHub {
            handlers: self.handlers,
            skip_files_with_missing_handler: self.skip_files_with_missing_handler,
        }
    }
}

impl Default for ConfigHubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_handlers() -> Vec<Arc<dyn FileHandler>> {
    let mut handlers: Vec<Arc<dyn FileHandler>> = vec![Arc::new(JsonFileHandler::new())];

    #[cfg(feature = "yaml")]
    {
        use crate::adapters::YamlFileHandler;
        handlers.push(Arc::new(YamlFileHandler::new()));
    }

    #[cfg(feature = "dotenv")]
    {
        use crate::adapters::DotEnvFileHandler;
        handlers.push(Arc::new(DotEnvFileHandler::new()));
    }

    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Origin, SourceKind};
    use std::io::Write;

    fn map(pairs: &[(&str, ConfigValue)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_chain_order() {
        let hub = ConfigHub::new();
        let names: Vec<&str> = hub.handlers().iter().map(|h| h.name()).collect();
        assert_eq!(names[0], "JSON");
        #[cfg(all(feature = "yaml", feature = "dotenv"))]
        assert_eq!(names, vec!["JSON", "YAML", "DotEnv"]);
        assert!(hub.skip_files_with_missing_handler());
    }

    #[test]
    fn test_aggregate_mappings_in_order() {
        let store = ConfigHub::new()
            .aggregate(vec![
                map(&[("A", 1.into()), ("B", 2.into())]),
                map(&[("B", 3.into())]),
            ])
            .unwrap();

        assert_eq!(store.get("A").unwrap(), Some(&ConfigValue::from(1)));
        assert_eq!(store.get("B").unwrap(), Some(&ConfigValue::from(3)));
        assert_eq!(store.applied_confs().len(), 2);
    }

    #[test]
    fn test_aggregate_rejects_scalar_value() {
        let result = ConfigHub::new().aggregate(vec![Input::from(ConfigValue::from(5))]);
        assert!(matches!(result, Err(ConfigError::UnsupportedType { .. })));
    }

    #[test]
    fn test_aggregate_null_value_is_noop() {
        let store = ConfigHub::new()
            .aggregate(vec![Input::from(ConfigValue::Null)])
            .unwrap();
        assert!(store.is_empty());
        assert!(store.applied_confs().is_empty());
    }

    #[test]
    fn test_conditional_sees_previous_inputs() {
        let conditional = |store: &ConfigStore| {
            let debug = store.value("DEBUG").ok().flatten().and_then(ConfigValue::as_bool);
            debug
                .filter(|d| *d)
                .map(|_| map(&[("LOG_LEVEL", "debug".into())]))
        };

        let store = ConfigHub::new()
            .aggregate(vec![
                Input::from(map(&[("DEBUG", true.into())])),
                Input::conditional(conditional),
            ])
            .unwrap();
        assert_eq!(store.get("LOG_LEVEL").unwrap(), Some(&ConfigValue::from("debug")));

        let store = ConfigHub::new()
            .aggregate(vec![
                Input::from(map(&[("DEBUG", false.into())])),
                Input::conditional(conditional),
            ])
            .unwrap();
        assert!(!store.contains("LOG_LEVEL"));
        assert_eq!(store.applied_confs().len(), 1);
    }

    #[test]
    fn test_config_from_file_without_handlers() {
        let hub = ConfigHub::builder().without_handlers().build();
        let result = hub.config_from_file(Path::new("config.json"), None);
        assert!(matches!(result, Err(ConfigError::NoAvailableHandlers)));
    }

    #[test]
    fn test_config_from_file_missing_handler() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.text");
        std::fs::write(&path, "a=b").unwrap();

        let skipping = ConfigHub::new();
        assert!(skipping.config_from_file(&path, None).unwrap().is_none());

        let strict = ConfigHub::builder()
            .skip_files_with_missing_handler(false)
            .build();
        let err = strict.config_from_file(&path, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoHandler { .. }));
        assert!(err.to_string().contains("test.text"));
    }

    #[test]
    fn test_config_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "demo"}}"#).unwrap();

        let store = ConfigHub::new()
            .config_from_file(file.path(), None)
            .unwrap()
            .unwrap();
        assert_eq!(store.kind(), &SourceKind::Json);
        assert_eq!(store.handler(), Some("JSON"));
        assert!(matches!(store.origin(), Some(Origin::Path(_))));
    }

    #[test]
    fn test_config_from_file_explicit_handler() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "demo"}}"#).unwrap();

        let hub = ConfigHub::builder().without_handlers().build();
        let store = hub
            .config_from_file(file.path(), Some(&JsonFileHandler::new()))
            .unwrap();
        assert!(store.is_some());
    }

    #[test]
    fn test_stream_input() {
        let store = ConfigHub::new()
            .aggregate(vec![Input::stream(
                std::io::Cursor::new(r#"{"a": 1}"#.as_bytes().to_vec()),
                JsonFileHandler::new(),
            )])
            .unwrap();

        let record = store.applied_from("a").unwrap();
        assert_eq!(record.kind, SourceKind::Io);
        assert_eq!(record.handler.as_deref(), Some("JSON"));
        assert!(record.name.as_deref().unwrap().contains("Cursor"));
    }

    #[test]
    fn test_stream_errors_surface() {
        let result = ConfigHub::new().aggregate(vec![Input::stream(
            std::io::Cursor::new(b"[1, 2]".to_vec()),
            JsonFileHandler::new(),
        )]);
        assert!(matches!(result, Err(ConfigError::WrongFormat { .. })));
    }

    #[test]
    fn test_config_from_dict_meta() {
        let store = ConfigHub::new()
            .config_from_dict(
                map(&[("A", 1.into())]),
                SourceMeta::new().name("inline").kind(SourceKind::Custom("manual".into())),
            )
            .unwrap();
        assert_eq!(store.name(), Some("inline"));
        assert_eq!(store.kind().as_str(), "manual");
        assert_eq!(store.applied_confs()[0].name.as_deref(), Some("inline"));
    }

    #[test]
    fn test_aggregate_into_strict_target() {
        let target = ConfigStore::builder()
            .initial(map(&[("A", 1.into())]))
            .strict_keys(true)
            .build()
            .unwrap();

        let result = ConfigHub::new()
            .aggregate_into(vec![map(&[("B", 2.into())])], target.clone());
        assert!(matches!(result, Err(ConfigError::StrictKeysViolation { .. })));

        let store = ConfigHub::new()
            .aggregate_into(vec![map(&[("A", 2.into())])], target)
            .unwrap();
        assert_eq!(store.get("A").unwrap(), Some(&ConfigValue::from(2)));
    }
}
