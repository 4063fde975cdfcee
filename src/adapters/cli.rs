// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! This module provides [`ArgNamespace`], the parsed-arguments source. A namespace can
//! be built from raw arguments, from `clap` matches, or from any serializable struct
//! (such as a `clap` derive struct). Every declared argument is present in the
//! namespace; arguments the user did not pass are `Null`, so a store configured with
//! `none_considered_empty` keeps its earlier values for them.

use crate::domain::{ConfigError, ConfigMap, ConfigSource, ConfigValue, Result};
use clap::{ArgAction, ArgMatches, Command};
use std::any::Any;
use std::path::PathBuf;

/// Parsed command-line arguments.
///
/// Supported raw argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
/// - `--flag`: Long form without a value, read as `true`
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::ArgNamespace;
///
/// let args = vec!["--database.host=localhost", "--port", "5432", "--verbose"];
/// let namespace = ArgNamespace::from_args(args);
/// assert_eq!(namespace.get("port").unwrap(), "5432");
/// assert_eq!(namespace.get("verbose").unwrap(), &true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgNamespace {
    /// Argument values by destination name
    values: ConfigMap,
}

impl ArgNamespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namespace from a list of raw arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - The arguments, without the program name
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut namespace = Self::new();
        namespace.parse_args(args);
        namespace
    }

    /// Creates a namespace from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfghub::adapters::ArgNamespace;
    ///
    /// let namespace = ArgNamespace::from_env_args();
    /// ```
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Creates a namespace from any serializable value with named fields.
    ///
    /// `None` fields become `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedType`] if the value does not serialize to a
    /// mapping.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfghub::adapters::ArgNamespace;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Args {
    ///     age: Option<u8>,
    ///     country: Option<String>,
    /// }
    ///
    /// let args = Args { age: Some(34), country: None };
    /// let namespace = ArgNamespace::from_serialize(&args).unwrap();
    /// assert_eq!(namespace.get("age").unwrap(), &34);
    /// assert!(namespace.get("country").unwrap().is_null());
    /// ```
    pub fn from_serialize<T: serde::Serialize>(args: &T) -> Result<Self> {
        let value = serde_json::to_value(args).map_err(|e| ConfigError::SourceError {
            source_name: "args".to_string(),
            message: "failed to serialize arguments".to_string(),
            source: Some(Box::new(e)),
        })?;

        match ConfigValue::from(value) {
            ConfigValue::Mapping(values) => Ok(Self { values }),
            other => Err(ConfigError::UnsupportedType {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// Creates a namespace from `clap` matches.
    ///
    /// Every argument declared on `command` is present. Flags become booleans,
    /// counters become integers, arguments with several values become sequences and
    /// arguments that were not given become `Null`. Help and version actions are
    /// skipped.
    pub fn from_matches(command: &Command, matches: &ArgMatches) -> Self {
        let mut values = ConfigMap::new();

        for arg in command.get_arguments() {
            let id = arg.get_id().as_str();
            let value = match arg.get_action() {
                ArgAction::Help
                | ArgAction::HelpShort
                | ArgAction::HelpLong
                | ArgAction::Version => continue,
                ArgAction::SetTrue | ArgAction::SetFalse => matches
                    .try_get_one::<bool>(id)
                    .ok()
                    .flatten()
                    .map(|b| ConfigValue::from(*b))
                    .unwrap_or(ConfigValue::Null),
                ArgAction::Count => matches
                    .try_get_one::<u8>(id)
                    .ok()
                    .flatten()
                    .map(|c| ConfigValue::from(u32::from(*c)))
                    .unwrap_or(ConfigValue::Null),
                action => {
                    let items = argument_values(matches, id);
                    if matches!(action, ArgAction::Append) || items.len() > 1 {
                        if items.is_empty() {
                            ConfigValue::Null
                        } else {
                            ConfigValue::Sequence(items)
                        }
                    } else {
                        items.into_iter().next().unwrap_or(ConfigValue::Null)
                    }
                }
            };
            values.insert(id.to_string(), value);
        }

        Self { values }
    }

    /// Parses `args` with `command` and creates a namespace from the matches.
    ///
    /// The first element of `args` is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if `clap` rejects the arguments.
    pub fn parse_from<I, T>(command: Command, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches =
            command
                .clone()
                .try_get_matches_from(args)
                .map_err(|e| ConfigError::ParseError {
                    message: format!("invalid arguments for {}", command.get_name()),
                    source: Some(Box::new(e)),
                })?;
        Ok(Self::from_matches(&command, &matches))
    }

    /// Returns a single argument value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Returns all argument values.
    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// Returns a textual description of the namespace, used as its origin.
    pub fn description(&self) -> String {
        let fields: Vec<String> = self
            .values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.to_json()))
            .collect();
        format!("Namespace({})", fields.join(", "))
    }

    /// Parses command-line arguments and populates the values map.
    fn parse_args<S: AsRef<str>>(&mut self, args: Vec<S>) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();
            let next: Option<&str> = args.get(i + 1).map(|s| s.as_ref());

            if let Some(long) = arg.strip_prefix("--") {
                // Handle --key=value format
                if let Some((key, value)) = long.split_once('=') {
                    self.insert(key, value);
                    i += 1;
                }
                // Handle --key value format
                else if let Some(value) = next.filter(|n| !n.starts_with('-')) {
                    self.insert(long, value);
                    i += 2;
                }
                // A bare flag
                else {
                    self.values.insert(long.to_string(), ConfigValue::from(true));
                    i += 1;
                }
            }
            // Handle -k value format (single character short form)
            else if arg.starts_with('-') && arg.len() == 2 {
                let key = &arg[1..];
                match next.filter(|n| !n.starts_with('-')) {
                    Some(value) => {
                        self.insert(key, value);
                        i += 2;
                    }
                    None => {
                        self.values.insert(key.to_string(), ConfigValue::from(true));
                        i += 1;
                    }
                }
            } else {
                i += 1;
            }
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), ConfigValue::from(value));
    }
}

// Reads the values of one argument, preferring the type its value parser produced.
fn argument_values(matches: &ArgMatches, id: &str) -> Vec<ConfigValue> {
    typed_values::<String>(matches, id, |s| ConfigValue::from(s.as_str()))
        .or_else(|| typed_values::<i64>(matches, id, |v| ConfigValue::from(*v)))
        .or_else(|| typed_values::<i32>(matches, id, |v| ConfigValue::from(*v)))
        .or_else(|| typed_values::<u8>(matches, id, |v| ConfigValue::from(u32::from(*v))))
        .or_else(|| typed_values::<u16>(matches, id, |v| ConfigValue::from(u32::from(*v))))
        .or_else(|| typed_values::<u32>(matches, id, |v| ConfigValue::from(*v)))
        .or_else(|| {
            typed_values::<u64>(matches, id, |v| match i64::try_from(*v) {
                Ok(i) => ConfigValue::from(i),
                Err(_) => ConfigValue::from(*v as f64),
            })
        })
        .or_else(|| typed_values::<f64>(matches, id, |v| ConfigValue::from(*v)))
        .or_else(|| typed_values::<bool>(matches, id, |v| ConfigValue::from(*v)))
        .or_else(|| {
            typed_values::<PathBuf>(matches, id, |p| ConfigValue::from(p.display().to_string()))
        })
        .or_else(|| match matches.try_get_raw(id) {
            Ok(Some(raw)) => Some(
                raw.map(|os| ConfigValue::from(os.to_string_lossy().into_owned()))
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}

fn typed_values<T>(
    matches: &ArgMatches,
    id: &str,
    convert: impl Fn(&T) -> ConfigValue,
) -> Option<Vec<ConfigValue>>
where
    T: Any + Clone + Send + Sync + 'static,
{
    match matches.try_get_many::<T>(id) {
        Ok(Some(values)) => Some(values.map(convert).collect()),
        Ok(None) => Some(Vec::new()),
        Err(_) => None,
    }
}

impl From<ArgNamespace> for ConfigSource {
    fn from(namespace: ArgNamespace) -> Self {
        let description = namespace.description();
        ConfigSource::Namespace {
            values: namespace.values,
            description,
        }
    }
}
