//! Tagged runtime values
//!
//! [`Value`] is what a field stores and what external callers hand in. A
//! field's stored value is always `Null` or of its declared [`ValueType`];
//! [`Value::Map`] only ever appears on the input side.

use crate::convert::format_date;
use crate::error::ParseValueTypeError;
use crate::lookup::LookupValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Declared target type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text
    Text,
    /// 32-bit signed integer
    Integer,
    /// Arbitrary precision decimal
    Decimal,
    /// Point in time (UTC)
    Date,
    /// Yes/no flag
    Boolean,
    /// Reference resolved through a lookup source
    Lookup,
}

impl ValueType {
    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Lookup => "lookup",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = ParseValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(Self::Text),
            "integer" | "int" => Ok(Self::Integer),
            "decimal" | "number" => Ok(Self::Decimal),
            "date" => Ok(Self::Date),
            "boolean" | "bool" => Ok(Self::Boolean),
            "lookup" => Ok(Self::Lookup),
            _ => Err(ParseValueTypeError(s.to_string())),
        }
    }
}

/// Runtime tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The domain null sentinel
    Null,
    /// Text
    Text,
    /// Integer
    Integer,
    /// Decimal
    Decimal,
    /// Date
    Date,
    /// Boolean
    Boolean,
    /// Lookup value
    Lookup,
    /// Keyed mapping (input only)
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Lookup => "lookup",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// Runtime value
///
/// Serializes to and from natural JSON (see the `From` conversions).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum Value {
    /// Null sentinel
    #[default]
    Null,
    /// Text
    Text(String),
    /// Integer
    Integer(i32),
    /// Decimal
    Decimal(Decimal),
    /// Date
    Date(DateTime<Utc>),
    /// Boolean
    Boolean(bool),
    /// Lookup value
    Lookup(LookupValue),
    /// Keyed id/display mapping
    Map(BTreeMap<String, String>),
}

impl Value {
    /// Create text value
    #[inline]
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create lookup value
    #[inline]
    #[must_use]
    pub fn lookup(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::Lookup(LookupValue::new(id, display_name))
    }

    /// Check for the null sentinel
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Runtime kind
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Date(_) => ValueKind::Date,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Lookup(_) => ValueKind::Lookup,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Target type this value already satisfies, if any
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Text(_) => Some(ValueType::Text),
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Decimal(_) => Some(ValueType::Decimal),
            Self::Date(_) => Some(ValueType::Date),
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Lookup(_) => Some(ValueType::Lookup),
            Self::Null | Self::Map(_) => None,
        }
    }

    /// Integer payload
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text payload
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lookup payload
    #[inline]
    #[must_use]
    pub fn as_lookup(&self) -> Option<&LookupValue> {
        match self {
            Self::Lookup(l) => Some(l),
            _ => None,
        }
    }

    /// Order two values of comparable kinds
    ///
    /// Integers and decimals compare numerically with each other; lookups
    /// compare by id. Any other mix is unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Self::Decimal(a), Self::Integer(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Lookup(a), Self::Lookup(b)) => Some(a.id().cmp(b.id())),
            _ => None,
        }
    }

    /// Render as wire JSON
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self.clone())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Date(d) => f.write_str(&format_date(d)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Lookup(l) => write!(f, "{l}"),
            Self::Map(m) => write!(f, "{}", JsonValue::from(Self::Map(m.clone()))),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<LookupValue> for Value {
    fn from(l: LookupValue) -> Self {
        Self::Lookup(l)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => number_to_value(&n),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| {
                        let v = match v {
                            JsonValue::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, v)
                    })
                    .collect(),
            ),
            array @ JsonValue::Array(_) => Self::Text(array.to_string()),
        }
    }
}

fn number_to_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).map_or_else(|_| Value::Decimal(Decimal::from(i)), Value::Integer);
    }
    if let Some(u) = n.as_u64() {
        return Value::Decimal(Decimal::from(u));
    }
    let rendered = n.to_string();
    Decimal::from_str(&rendered)
        .or_else(|_| Decimal::from_scientific(&rendered))
        .map_or(Value::Text(rendered), Value::Decimal)
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Text(s) => Self::String(s),
            Value::Integer(i) => Self::from(i),
            Value::Decimal(d) => Self::String(d.to_string()),
            Value::Date(d) => Self::String(format_date(&d)),
            Value::Boolean(b) => Self::Bool(b),
            Value::Lookup(l) => {
                let mut map = serde_json::Map::new();
                map.insert(l.id().to_string(), Self::String(l.display_name().to_string()));
                Self::Object(map)
            }
            Value::Map(m) => Self::Object(m.into_iter().map(|(k, v)| (k, Self::String(v))).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json_null_is_null_sentinel() {
        assert!(Value::from(json!(null)).is_null());
    }

    #[test]
    fn json_numbers_pick_narrowest_kind() {
        assert_eq!(Value::from(json!(5)), Value::Integer(5));
        assert_eq!(
            Value::from(json!(5_000_000_000_i64)),
            Value::Decimal(Decimal::from(5_000_000_000_i64))
        );
        assert_eq!(Value::from(json!(1.25)), Value::Decimal(Decimal::new(125, 2)));
    }

    #[test]
    fn json_object_becomes_map() {
        let v = Value::from(json!({"1000": "G000X", "n": 3}));
        let Value::Map(map) = v else {
            panic!("expected map");
        };
        assert_eq!(map.get("1000").map(String::as_str), Some("G000X"));
        assert_eq!(map.get("n").map(String::as_str), Some("3"));
    }

    #[test]
    fn lookup_renders_as_single_entry_object() {
        let json = Value::lookup("1000", "G000X").to_json();
        assert_eq!(json, json!({"1000": "G000X"}));
    }

    #[test]
    fn kind_and_type_agree() {
        assert_eq!(Value::Integer(1).kind(), ValueKind::Integer);
        assert_eq!(Value::Integer(1).value_type(), Some(ValueType::Integer));
        assert_eq!(Value::Null.value_type(), None);
        assert_eq!(Value::Map(BTreeMap::new()).value_type(), None);
    }

    #[test]
    fn compare_mixed_numerics() {
        let a = Value::Integer(2);
        let b = Value::Decimal(Decimal::new(25, 1));
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&Value::text("2")), None);
    }

    #[test]
    fn value_type_from_str() {
        assert_eq!("Integer".parse::<ValueType>().unwrap(), ValueType::Integer);
        assert!("blob".parse::<ValueType>().is_err());
    }

    #[test]
    fn serde_uses_natural_json() {
        let v: Value = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(v, Value::text("abc"));
        assert_eq!(serde_json::to_string(&Value::Integer(7)).unwrap(), "7");
    }
}
