//! Filter descriptors
//!
//! A [`FilterDescriptor`] declares how the named parameters of a wire filter
//! map to document fields, plus predicates that are always appended.

use docmodel_document::{DocumentFilterParam, Operator};
use serde::{Deserialize, Serialize};

/// One declared filter parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParamDescriptor {
    parameter_name: String,
    field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator: Option<Operator>,
    #[serde(default)]
    required: bool,
}

impl FilterParamDescriptor {
    /// Create optional parameter with the equals-or-range operator
    #[must_use]
    pub fn new(parameter_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            field_name: field_name.into(),
            operator: None,
            required: false,
        }
    }

    /// With explicit operator
    #[inline]
    #[must_use]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// With required flag
    #[inline]
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Wire parameter name
    #[inline]
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Target document field
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Explicit operator, `None` for equals-or-range
    #[inline]
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Must be present and non-empty
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Registered filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    filter_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    parameters: Vec<FilterParamDescriptor>,
    #[serde(default)]
    internal_parameters: Vec<DocumentFilterParam>,
}

impl FilterDescriptor {
    /// Create descriptor without parameters
    #[must_use]
    pub fn new(filter_id: impl Into<String>) -> Self {
        Self {
            filter_id: filter_id.into(),
            display_name: None,
            parameters: Vec::new(),
            internal_parameters: Vec::new(),
        }
    }

    /// With display name
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Append declared parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: FilterParamDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append internal predicate
    #[must_use]
    pub fn with_internal_parameter(mut self, parameter: DocumentFilterParam) -> Self {
        self.internal_parameters.push(parameter);
        self
    }

    /// Filter id
    #[inline]
    #[must_use]
    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// Display name, falling back to the filter id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.filter_id)
    }

    /// Declared parameters in resolution order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[FilterParamDescriptor] {
        &self.parameters
    }

    /// Declared parameter targeting `field_name`
    #[must_use]
    pub fn parameter_by_field_name(&self, field_name: &str) -> Option<&FilterParamDescriptor> {
        self.parameters.iter().find(|p| p.field_name == field_name)
    }

    /// Predicates appended to every resolved filter
    #[inline]
    #[must_use]
    pub fn internal_parameters(&self) -> &[DocumentFilterParam] {
        &self.internal_parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yaml_shape() {
        let yaml = r#"
filterId: default
parameters:
  - parameterName: DateFrom
    fieldName: DateTrx
    operator: BETWEEN
    required: true
  - parameterName: Partner
    fieldName: C_BPartner_ID
internalParameters:
  - fieldName: IsActive
    operator: EQUAL
    value: "Y"
"#;
        let descriptor: FilterDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(descriptor.display_name(), "default");
        assert_eq!(descriptor.parameters().len(), 2);
        assert_eq!(descriptor.parameters()[0].operator(), Some(Operator::Between));
        assert!(descriptor.parameters()[0].is_required());
        assert!(!descriptor.parameters()[1].is_required());
        assert_eq!(descriptor.parameters()[1].operator(), None);
        assert_eq!(descriptor.internal_parameters()[0].field_name(), "IsActive");
    }

    #[test]
    fn parameter_by_field_name() {
        let descriptor = FilterDescriptor::new("byPartner")
            .with_display_name("By partner")
            .with_parameter(FilterParamDescriptor::new("Partner", "C_BPartner_ID"));
        assert_eq!(descriptor.display_name(), "By partner");
        assert_eq!(
            descriptor.parameter_by_field_name("C_BPartner_ID").map(FilterParamDescriptor::parameter_name),
            Some("Partner")
        );
        assert!(descriptor.parameter_by_field_name("Name").is_none());
    }
}
