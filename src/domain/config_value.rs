// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value tree with typed accessors.
//!
//! This module provides [`ConfigValue`], the value type stored in a
//! [`ConfigStore`](crate::domain::ConfigStore). Unlike raw source strings, values form a
//! tree of primitives, sequences, ordered mappings and typed objects so that the
//! recursive merge strategy can combine them structurally.

use crate::domain::errors::{ConfigError, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Insertion-ordered mapping of raw keys to values.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A configuration value.
///
/// # Examples
///
/// ```
/// use cfghub::domain::ConfigValue;
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.as_i64(), Some(42));
/// assert_eq!(value.type_name(), "integer");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConfigValue {
    /// Absent/null value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String
    String(String),
    /// Ordered list of values
    Sequence(Vec<ConfigValue>),
    /// Ordered key/value mapping
    Mapping(ConfigMap),
    /// A typed object with named fields
    Object(TypedObject),
}

/// A structured value with a type tag and named fields.
///
/// Typed objects are produced by a
/// [`ValueConstructor`](crate::ports::ValueConstructor) and are merged field-by-field by
/// the recursive strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObject {
    type_name: String,
    fields: ConfigMap,
}

impl TypedObject {
    /// Creates a typed object from its type tag and fields.
    pub fn new(type_name: impl Into<String>, fields: ConfigMap) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Returns the type tag.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the named fields.
    pub fn fields(&self) -> &ConfigMap {
        &self.fields
    }

    /// Returns the named fields mutably.
    pub fn fields_mut(&mut self) -> &mut ConfigMap {
        &mut self.fields
    }

    /// Returns a single field.
    pub fn get(&self, field: &str) -> Option<&ConfigValue> {
        self.fields.get(field)
    }

    /// Splits the object into its type tag and fields.
    pub fn into_parts(self) -> (String, ConfigMap) {
        (self.type_name, self.fields)
    }
}

impl ConfigValue {
    /// Returns a short name of the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
            ConfigValue::Object(_) => "object",
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns `true` for booleans, numbers and strings.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ConfigValue::Bool(_)
                | ConfigValue::Integer(_)
                | ConfigValue::Float(_)
                | ConfigValue::String(_)
        )
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as `f64` if this is a float or an integer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the items if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping if this is a mapping.
    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the typed object if this is an object.
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            ConfigValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Converts the value into a `serde_json::Value`.
    ///
    /// Typed objects become JSON objects of their fields. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(b) => serde_json::Value::Bool(*b),
            ConfigValue::Integer(i) => serde_json::Value::from(*i),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ConfigValue::String(s) => serde_json::Value::String(s.clone()),
            ConfigValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(ConfigValue::to_json).collect())
            }
            ConfigValue::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            ConfigValue::Object(obj) => serde_json::Value::Object(
                obj.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Deserializes the value into any `serde` type.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfghub::domain::ConfigValue;
    ///
    /// let value = ConfigValue::from(vec![1, 2, 3]);
    /// let items: Vec<u16> = value.deserialize("test.key").unwrap();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        serde_json::from_value(self.to_json())
            .map_err(|e| ConfigError::from_deserialize_error::<T>(key, e))
    }

    /// Parses the textual form of the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfghub::domain::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("test.key").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.to_string()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<u32> for ConfigValue {
    fn from(i: u32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ConfigValue::Null)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl From<TypedObject> for ConfigValue {
    fn from(obj: TypedObject) -> Self {
        ConfigValue::Object(obj)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            serde_yaml::Value::String(s) => s,
                            other => ConfigValue::from(other).to_string(),
                        };
                        (key, ConfigValue::from(v))
                    })
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => ConfigValue::from(tagged.value),
        }
    }
}

impl PartialEq<str> for ConfigValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for ConfigValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for ConfigValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for ConfigValue {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<bool> for ConfigValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<f64> for ConfigValue {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, ConfigValue::Float(f) if f == other)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_none(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Mapping(map) => serialize_map(map, serializer),
            ConfigValue::Object(obj) => serialize_map(&obj.fields, serializer),
        }
    }
}

fn serialize_map<S: Serializer>(map: &ConfigMap, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, v)?;
    }
    out.end()
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(ConfigValue::from)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
