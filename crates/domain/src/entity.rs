//! In-memory value model walked by the validator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A value handed to (or returned from) a resource method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum EntityValue {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Text(String),
    /// Structured object with a known type name.
    Bean {
        /// Type name used to look up constraints.
        type_name: String,
        /// Properties in declaration order.
        properties: Vec<(String, EntityValue)>,
    },
    /// Keyed collection.
    Map(BTreeMap<String, EntityValue>),
    /// Growable sequence.
    List(Vec<EntityValue>),
    /// Fixed-size sequence.
    Array(Vec<EntityValue>),
}

impl EntityValue {
    /// Create a bean value.
    pub fn bean<K, I>(type_name: impl Into<String>, properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Bean {
            type_name: type_name.into(),
            properties: properties
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Convert a JSON document into a bean of the given type.
    ///
    /// Top-level objects become beans; anything else converts as-is.
    pub fn bean_from_json(type_name: impl Into<String>, value: Value) -> Self {
        match value {
            Value::Object(object) => Self::Bean {
                type_name: type_name.into(),
                properties: object
                    .into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            },
            other => Self::from(other),
        }
    }

    /// Returns true for [`EntityValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Bean type name, when this is a bean.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Bean { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    /// Look up a bean property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Bean { properties, .. } => properties
                .iter()
                .find(|(candidate, _)| candidate == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Convert into a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Integer(value) => Value::Number(Number::from(*value)),
            Self::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Text(value) => Value::String(value.clone()),
            Self::Bean { properties, .. } => Value::Object(
                properties
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::List(items) | Self::Array(items) => {
                Value::Array(items.iter().map(Self::to_json).collect())
            },
        }
    }
}

impl From<Value> for EntityValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => number.as_i64().map_or_else(
                || Self::Float(number.as_f64().unwrap_or(f64::NAN)),
                Self::Integer,
            ),
            Value::String(value) => Self::Text(value),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(object) => Self::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<EntityValue> for Value {
    fn from(value: EntityValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for EntityValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for EntityValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for EntityValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for EntityValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_maps_unless_typed() {
        let value = EntityValue::from(json!({"name": "x"}));
        assert!(matches!(value, EntityValue::Map(_)));

        let bean = EntityValue::bean_from_json("Person", json!({"name": "x", "age": 3}));
        assert_eq!(bean.type_name(), Some("Person"));
        assert_eq!(bean.property("age"), Some(&EntityValue::Integer(3)));
    }

    #[test]
    fn bean_properties_keep_declaration_order() {
        let bean = EntityValue::bean(
            "Pair",
            [("b", EntityValue::from(1)), ("a", EntityValue::from(2))],
        );
        let names = match &bean {
            EntityValue::Bean { properties, .. } => {
                Some(properties.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>())
            },
            _ => None,
        };
        assert_eq!(names, Some(vec!["b", "a"]));
        assert_eq!(bean.property("b"), Some(&EntityValue::Integer(1)));
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        assert_eq!(EntityValue::Float(f64::NAN).to_json(), Value::Null);
        assert_eq!(EntityValue::Float(1.5).to_json(), json!(1.5));
    }

    #[test]
    fn display_is_compact_json() {
        let value = EntityValue::List(vec![EntityValue::from("a"), EntityValue::Null]);
        assert_eq!(value.to_string(), r#"["a",null]"#);
    }
}
