//! Conversion table
//!
//! One explicit rule per (source kind, target type) pair. A value that
//! already has the target type passes through untouched; anything without a
//! rule fails with [`ConversionError::NoRule`].
//!
//! | source | target | rule |
//! |---|---|---|
//! | any | text | `Display` |
//! | text | integer / decimal / date | canonical parse |
//! | decimal | integer | truncation toward zero, range checked |
//! | integer | decimal | widening |
//! | any | boolean | tri-state truthiness, default `false` |
//! | map | lookup | `{id: display}` or `{key, caption}` |
//! | text | lookup | `""` is null, otherwise resolved by id |

use crate::error::ConversionError;
use crate::lookup::{LookupResolver, LookupValue};
use crate::value::{Value, ValueType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Convert `value` to `target`
///
/// `lookup` is only consulted for text → lookup conversions.
///
/// # Errors
/// Returns error if no rule matches or the matching rule fails
pub fn convert(
    value: &Value,
    target: ValueType,
    lookup: Option<&dyn LookupResolver>,
) -> Result<Value, ConversionError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if value.value_type() == Some(target) {
        return Ok(value.clone());
    }

    let from = value.kind();
    match (target, value) {
        (ValueType::Text, other) => Ok(Value::Text(other.to_string())),

        (ValueType::Integer, Value::Text(s)) => s
            .parse::<i32>()
            .map(Value::Integer)
            .map_err(|e| ConversionError::parse(from, target, e)),
        (ValueType::Integer, Value::Decimal(d)) => truncate_to_int(*d).map(Value::Integer),

        (ValueType::Decimal, Value::Text(s)) => Decimal::from_str(s)
            .map(Value::Decimal)
            .map_err(|e| ConversionError::parse(from, target, e)),
        (ValueType::Decimal, Value::Integer(i)) => Ok(Value::Decimal(Decimal::from(*i))),

        (ValueType::Date, Value::Text(s)) => parse_date(s)
            .map(Value::Date)
            .map_err(|e| ConversionError::parse(from, target, e)),

        (ValueType::Boolean, other) => Ok(Value::Boolean(truthiness(other).unwrap_or(false))),

        (ValueType::Lookup, Value::Map(map)) => lookup_from_map(map).map(Value::Lookup),
        (ValueType::Lookup, Value::Text(s)) if s.is_empty() => Ok(Value::Null),
        (ValueType::Lookup, Value::Text(s)) => match lookup {
            Some(resolver) => Ok(resolver.find_by_id(s).map_or(Value::Null, Value::Lookup)),
            None => Err(ConversionError::NoRule { from, to: target }),
        },

        _ => Err(ConversionError::NoRule { from, to: target }),
    }
}

/// Tri-state truthiness
///
/// `Some(true)` for `true`, `"Y"`, `"true"`; `Some(false)` for `false`,
/// `"N"`, `"false"` (text matched case-insensitively); `None` otherwise.
#[must_use]
pub fn truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Text(s) if s.eq_ignore_ascii_case("y") || s.eq_ignore_ascii_case("true") => {
            Some(true)
        }
        Value::Text(s) if s.eq_ignore_ascii_case("n") || s.eq_ignore_ascii_case("false") => {
            Some(false)
        }
        _ => None,
    }
}

/// Parse the canonical date format
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
///
/// # Errors
/// Returns the parser error for the RFC 3339 attempt if neither form matches
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|date| Utc.from_utc_datetime(&NaiveDateTime::new(date, NaiveTime::default())))
            .map_err(|_| rfc_err),
    }
}

/// Render a date in the canonical format
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn truncate_to_int(d: Decimal) -> Result<i32, ConversionError> {
    d.trunc().to_i32().ok_or_else(|| ConversionError::OutOfRange {
        value: d.to_string(),
        to: ValueType::Integer,
    })
}

fn lookup_from_map(map: &BTreeMap<String, String>) -> Result<LookupValue, ConversionError> {
    if let Some(key) = map.get("key") {
        let caption = map.get("caption").cloned().unwrap_or_default();
        return Ok(LookupValue::new(key.clone(), caption));
    }

    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((id, display)), None) => Ok(LookupValue::new(id.clone(), display.clone())),
        _ => Err(ConversionError::InvalidLookupMap { entries: map.len() }),
    }
}
