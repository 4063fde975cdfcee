// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed value construction for enumerated defaults with declared types.

use crate::adapters::preprocessors::CastingPreprocessor;
use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result, TypedObject};
use crate::ports::ValueConstructor;
use indexmap::IndexMap;

/// A registered object type: a type tag and its fields with default values.
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::ObjectType;
/// use cfghub::domain::ConfigValue;
///
/// let geo = ObjectType::new("Geo")
///     .field("country", ConfigValue::Null)
///     .field("city", ConfigValue::Null);
/// assert_eq!(geo.name(), "Geo");
/// assert_eq!(geo.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    name: String,
    fields: ConfigMap,
}

impl ObjectType {
    /// Creates an object type without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: ConfigMap::new(),
        }
    }

    /// Adds a field with its default value.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        self.fields.insert(name.into(), default.into());
        self
    }

    /// Returns the type tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields and their defaults.
    pub fn fields(&self) -> &ConfigMap {
        &self.fields
    }

    /// Builds an instance from a mapping. Keys that are not fields are ignored.
    pub fn instantiate(&self, values: ConfigMap) -> TypedObject {
        let mut fields = self.fields.clone();
        for (key, value) in values {
            if let Some(slot) = fields.get_mut(&key) {
                *slot = value;
            }
        }
        TypedObject::new(self.name.clone(), fields)
    }
}

/// Builds typed values for the primitive tags `int`, `float`, `bool` and `str`, and for
/// registered [`ObjectType`]s.
///
/// `Null` is always returned unchanged. Unknown tags and values that cannot be
/// converted fail with [`ConfigError::ValueConstruction`].
///
/// # Examples
///
/// ```rust
/// use cfghub::adapters::{ObjectType, TypedValueConstructor};
/// use cfghub::domain::{ConfigMap, ConfigValue};
/// use cfghub::ports::ValueConstructor;
///
/// let constructor = TypedValueConstructor::new()
///     .with_type(ObjectType::new("Geo").field("city", "unknown"));
///
/// assert_eq!(constructor.construct("int", "34".into()).unwrap(), 34);
/// assert!(constructor.construct("int", "old".into()).is_err());
///
/// let mut raw = ConfigMap::new();
/// raw.insert("city".into(), "Kyiv".into());
/// let geo = constructor.construct("Geo", raw.into()).unwrap();
/// assert_eq!(geo.as_object().unwrap().get("city").unwrap(), "Kyiv");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypedValueConstructor {
    types: IndexMap<String, ObjectType>,
}

impl TypedValueConstructor {
    /// Creates a constructor for the primitive tags only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object type.
    pub fn with_type(mut self, object_type: ObjectType) -> Self {
        self.types.insert(object_type.name.clone(), object_type);
        self
    }

    /// Returns a registered object type.
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name)
    }

    fn construct_object(&self, object_type: &ObjectType, raw: ConfigValue) -> Result<ConfigValue> {
        match raw {
            ConfigValue::Mapping(values) => {
                Ok(ConfigValue::Object(object_type.instantiate(values)))
            }
            ConfigValue::Object(obj) if obj.type_name() == object_type.name() => {
                Ok(ConfigValue::Object(obj))
            }
            ConfigValue::Object(obj) => {
                let (_, values) = obj.into_parts();
                Ok(ConfigValue::Object(object_type.instantiate(values)))
            }
            other => Err(failure(
                object_type.name(),
                format!("expected a mapping, found {}", other.type_name()),
            )),
        }
    }
}

fn failure(type_name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValueConstruction {
        type_name: type_name.to_string(),
        message: message.into(),
    }
}

fn to_int(raw: ConfigValue) -> Result<ConfigValue> {
    match raw {
        ConfigValue::Integer(i) => Ok(ConfigValue::Integer(i)),
        ConfigValue::Bool(b) => Ok(ConfigValue::Integer(i64::from(b))),
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        ConfigValue::Float(f)
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(ConfigValue::Integer(f as i64))
        }
        ConfigValue::Float(f) => Err(failure("int", format!("{} is not a whole i64", f))),
        ConfigValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|e| failure("int", format!("'{}': {}", s, e))),
        other => Err(failure("int", format!("cannot convert {}", other.type_name()))),
    }
}

fn to_float(raw: ConfigValue) -> Result<ConfigValue> {
    match raw {
        ConfigValue::Float(f) => Ok(ConfigValue::Float(f)),
        ConfigValue::Integer(i) => Ok(ConfigValue::Float(i as f64)),
        ConfigValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|e| failure("float", format!("'{}': {}", s, e))),
        other => Err(failure("float", format!("cannot convert {}", other.type_name()))),
    }
}

fn to_bool(raw: ConfigValue) -> Result<ConfigValue> {
    match raw {
        ConfigValue::Bool(b) => Ok(ConfigValue::Bool(b)),
        ConfigValue::Integer(i) => Ok(ConfigValue::Bool(i != 0)),
        ConfigValue::String(s) => match CastingPreprocessor::cast(&s) {
            Some(ConfigValue::Bool(b)) => Ok(ConfigValue::Bool(b)),
            _ => Err(failure("bool", format!("'{}' is not a boolean", s))),
        },
        other => Err(failure("bool", format!("cannot convert {}", other.type_name()))),
    }
}

fn to_str(raw: ConfigValue) -> Result<ConfigValue> {
    match raw {
        ConfigValue::String(s) => Ok(ConfigValue::String(s)),
        primitive if primitive.is_primitive() => Ok(ConfigValue::String(primitive.to_string())),
        other => Err(failure("str", format!("cannot convert {}", other.type_name()))),
    }
}

impl ValueConstructor for TypedValueConstructor {
    fn construct(&self, type_tag: &str, raw: ConfigValue) -> Result<ConfigValue> {
        if raw.is_null() {
            return Ok(raw);
        }

        match type_tag {
            "int" => to_int(raw),
            "float" => to_float(raw),
            "bool" => to_bool(raw),
            "str" => to_str(raw),
            other => match self.types.get(other) {
                Some(object_type) => self.construct_object(object_type, raw),
                None => Err(failure(other, "unknown type")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int() {
        let c = TypedValueConstructor::new();
        assert_eq!(c.construct("int", "34".into()).unwrap(), 34);
        assert_eq!(c.construct("int", " 7 ".into()).unwrap(), 7);
        assert_eq!(c.construct("int", 0.into()).unwrap(), 0);
        assert_eq!(c.construct("int", 2.0.into()).unwrap(), 2);
        assert!(matches!(
            c.construct("int", "old".into()),
            Err(ConfigError::ValueConstruction { .. })
        ));
        assert!(c.construct("int", 2.5.into()).is_err());
    }

    #[test]
    fn test_int_rejects_out_of_range_floats() {
        let c = TypedValueConstructor::new();
        for f in [1e30, -1e30, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                c.construct("int", ConfigValue::Float(f)),
                Err(ConfigError::ValueConstruction { .. })
            ));
        }
        assert_eq!(
            c.construct("int", ConfigValue::Float(-9_223_372_036_854_775_808.0)).unwrap(),
            ConfigValue::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_float_bool_str() {
        let c = TypedValueConstructor::new();
        assert_eq!(c.construct("float", 3.into()).unwrap(), 3.0);
        assert_eq!(c.construct("float", "1.5".into()).unwrap(), 1.5);
        assert_eq!(c.construct("bool", "on".into()).unwrap(), true);
        assert_eq!(c.construct("bool", 0.into()).unwrap(), false);
        assert!(c.construct("bool", "maybe".into()).is_err());
        assert_eq!(c.construct("str", 42.into()).unwrap(), "42");
        assert!(c.construct("str", vec![1].into()).is_err());
    }

    #[test]
    fn test_null_passes_through() {
        let c = TypedValueConstructor::new();
        assert!(c.construct("int", ConfigValue::Null).unwrap().is_null());
        assert!(c.construct("Unknown", ConfigValue::Null).unwrap().is_null());
    }

    #[test]
    fn test_unknown_tag() {
        let err = TypedValueConstructor::new()
            .construct("Geo", ConfigMap::new().into())
            .unwrap_err();
        assert!(err.to_string().contains("Geo"));
    }

    #[test]
    fn test_object_type() {
        let c = TypedValueConstructor::new().with_type(
            ObjectType::new("Geo")
                .field("country", ConfigValue::Null)
                .field("city", "nowhere"),
        );

        let mut raw = ConfigMap::new();
        raw.insert("country".into(), "Ukraine".into());
        raw.insert("planet".into(), "Earth".into());

        let value = c.construct("Geo", raw.into()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.type_name(), "Geo");
        assert_eq!(obj.get("country").unwrap(), "Ukraine");
        assert_eq!(obj.get("city").unwrap(), "nowhere");
        assert!(obj.get("planet").is_none());

        assert!(c.construct("Geo", "Kyiv".into()).is_err());
        assert!(c.object_type("Geo").is_some());
    }
}
