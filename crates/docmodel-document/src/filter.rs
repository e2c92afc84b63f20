//! Document filters
//!
//! A [`DocumentFilter`] is an immutable list of predicates. Values are kept
//! raw; the repository executing the query interprets them against the
//! field types.

use crate::error::DocumentError;
use docmodel_value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// Value is one of a list
    InArray,
    /// Value is none of a list
    NotInArray,
    /// SQL-like pattern
    Like,
    /// Negated SQL-like pattern
    NotLike,
    /// Case-insensitive SQL-like pattern
    LikeIgnoreCase,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// Inclusive range `value..=value_to`
    Between,
}

impl Operator {
    /// Equals-or-range operator: `Between` if `value_to` is set, else `Equal`
    #[must_use]
    pub fn default_for(value_to: &Value) -> Self {
        if value_to.is_null() {
            Self::Equal
        } else {
            Self::Between
        }
    }

    /// Operator takes a range
    #[inline]
    #[must_use]
    pub fn is_range(self) -> bool {
        self == Self::Between
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::InArray => "IN",
            Self::NotInArray => "NOT IN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::LikeIgnoreCase => "ILIKE",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Between => "BETWEEN",
        };
        f.write_str(s)
    }
}

/// One predicate: field, operator, value and optional upper bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilterParam {
    field_name: String,
    operator: Operator,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    value_to: Value,
}

impl DocumentFilterParam {
    /// Start building a predicate
    #[inline]
    #[must_use]
    pub fn builder() -> DocumentFilterParamBuilder {
        DocumentFilterParamBuilder::default()
    }

    /// Predicate with the equals-or-range operator
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidFilter`] if `field_name` is empty
    pub fn of_name_value(
        field_name: impl Into<String>,
        value: impl Into<Value>,
        value_to: impl Into<Value>,
    ) -> Result<Self, DocumentError> {
        Self::builder()
            .field_name(field_name)
            .value(value)
            .value_to(value_to)
            .build()
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Operator
    #[inline]
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Value (lower bound for ranges)
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Upper bound, `Null` if unset
    #[inline]
    #[must_use]
    pub fn value_to(&self) -> &Value {
        &self.value_to
    }
}

impl fmt::Display for DocumentFilterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field_name, self.operator, self.value)?;
        if !self.value_to.is_null() {
            write!(f, " AND {}", self.value_to)?;
        }
        Ok(())
    }
}

/// Builder for [`DocumentFilterParam`]
#[derive(Debug, Clone, Default)]
pub struct DocumentFilterParamBuilder {
    field_name: String,
    operator: Option<Operator>,
    value: Value,
    value_to: Value,
}

impl DocumentFilterParamBuilder {
    /// Set field name
    #[must_use]
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Set operator; unset means equals-or-range
    #[must_use]
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set value
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Set upper bound
    #[must_use]
    pub fn value_to(mut self, value_to: impl Into<Value>) -> Self {
        self.value_to = value_to.into();
        self
    }

    /// Build predicate
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidFilter`] if no field name was set
    pub fn build(self) -> Result<DocumentFilterParam, DocumentError> {
        if self.field_name.is_empty() {
            return Err(DocumentError::InvalidFilter(
                "filter parameter requires a field name".to_string(),
            ));
        }

        let operator = self
            .operator
            .unwrap_or_else(|| Operator::default_for(&self.value_to));
        Ok(DocumentFilterParam {
            field_name: self.field_name,
            operator,
            value: self.value,
            value_to: self.value_to,
        })
    }
}

/// Immutable, identified list of predicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    filter_id: String,
    #[serde(default)]
    parameters: Vec<DocumentFilterParam>,
}

impl DocumentFilter {
    /// Start building a filter with `filter_id`
    #[inline]
    #[must_use]
    pub fn builder(filter_id: impl Into<String>) -> DocumentFilterBuilder {
        DocumentFilterBuilder {
            filter_id: filter_id.into(),
            parameters: Vec::new(),
        }
    }

    /// Filter id
    #[inline]
    #[must_use]
    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// Predicates in order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[DocumentFilterParam] {
        &self.parameters
    }

    /// First predicate on `field_name`
    #[must_use]
    pub fn parameter(&self, field_name: &str) -> Option<&DocumentFilterParam> {
        self.parameters.iter().find(|p| p.field_name == field_name)
    }
}

impl fmt::Display for DocumentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.filter_id)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str("]")
    }
}

/// Builder for [`DocumentFilter`]
#[derive(Debug, Clone)]
pub struct DocumentFilterBuilder {
    filter_id: String,
    parameters: Vec<DocumentFilterParam>,
}

impl DocumentFilterBuilder {
    /// Append predicate
    #[must_use]
    pub fn add_parameter(mut self, parameter: DocumentFilterParam) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append predicates
    #[must_use]
    pub fn add_parameters(mut self, parameters: impl IntoIterator<Item = DocumentFilterParam>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Build filter
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidFilter`] if the filter id is empty
    pub fn build(self) -> Result<DocumentFilter, DocumentError> {
        if self.filter_id.is_empty() {
            return Err(DocumentError::InvalidFilter("filter requires an id".to_string()));
        }
        Ok(DocumentFilter {
            filter_id: self.filter_id,
            parameters: self.parameters,
        })
    }
}
