//! Error types for value conversion

use crate::value::{ValueKind, ValueType};

/// Errors raised by the conversion table
///
/// These carry the source kind and target type only. Callers that know the
/// field name and raw value wrap this as the cause of their own error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No rule exists for this (source, target) pair
    #[error("no conversion rule from {from} to {to}")]
    NoRule {
        /// Runtime kind of the input
        from: ValueKind,
        /// Declared target type
        to: ValueType,
    },

    /// A rule exists but the input could not be parsed
    #[error("cannot parse {from} as {to}: {reason}")]
    Parse {
        /// Runtime kind of the input
        from: ValueKind,
        /// Declared target type
        to: ValueType,
        /// Parser message
        reason: String,
    },

    /// Numeric narrowing overflowed the target type
    #[error("value {value} is out of range for {to}")]
    OutOfRange {
        /// Offending value, rendered
        value: String,
        /// Declared target type
        to: ValueType,
    },

    /// A keyed mapping did not have a lookup shape
    #[error("keyed mapping with {entries} entries is not a lookup value")]
    InvalidLookupMap {
        /// Number of entries in the mapping
        entries: usize,
    },
}

impl ConversionError {
    /// Create parse error
    pub fn parse(from: ValueKind, to: ValueType, reason: impl ToString) -> Self {
        Self::Parse {
            from,
            to,
            reason: reason.to_string(),
        }
    }
}

/// Unknown value type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type: '{0}'")]
pub struct ParseValueTypeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rule_display() {
        let err = ConversionError::NoRule {
            from: ValueKind::Boolean,
            to: ValueType::Date,
        };
        assert_eq!(err.to_string(), "no conversion rule from boolean to date");
    }

    #[test]
    fn parse_error_display() {
        let err = ConversionError::parse(ValueKind::Text, ValueType::Integer, "invalid digit");
        assert!(err.to_string().contains("cannot parse text as integer"));
    }
}
