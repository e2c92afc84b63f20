//! Wire representation of filters
//!
//! `{"filterId": "...", "parameters": [{"parameterName", "value", "valueTo"}]}`

use crate::descriptor::FilterParamDescriptor;
use crate::registry::FilterDescriptorProvider;
use docmodel_document::DocumentFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One named parameter of a wire filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDocumentFilterParam {
    #[serde(default)]
    parameter_name: String,
    #[serde(default)]
    value: JsonValue,
    #[serde(default)]
    value_to: JsonValue,
}

impl JsonDocumentFilterParam {
    /// Create parameter
    #[must_use]
    pub fn new(parameter_name: impl Into<String>, value: JsonValue, value_to: JsonValue) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            value,
            value_to,
        }
    }

    /// Parameter name
    #[inline]
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    /// Raw upper bound
    #[inline]
    #[must_use]
    pub fn value_to(&self) -> &JsonValue {
        &self.value_to
    }
}

/// Filter as sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDocumentFilter {
    filter_id: String,
    #[serde(default)]
    parameters: Vec<JsonDocumentFilterParam>,
}

impl JsonDocumentFilter {
    /// Create wire filter
    #[must_use]
    pub fn new(filter_id: impl Into<String>, parameters: Vec<JsonDocumentFilterParam>) -> Self {
        Self {
            filter_id: filter_id.into(),
            parameters,
        }
    }

    /// Wrap a resolved filter for the wire
    ///
    /// For registered filters, field names are mapped back to parameter
    /// names and internal predicates are dropped; ad-hoc filters use field
    /// names as parameter names.
    #[must_use]
    pub fn of(filter: &DocumentFilter, provider: &dyn FilterDescriptorProvider) -> Self {
        let descriptor = provider.filter_descriptor(filter.filter_id());

        let parameters = filter
            .parameters()
            .iter()
            .filter(|param| {
                descriptor
                    .as_ref()
                    .map_or(true, |d| !d.internal_parameters().contains(param))
            })
            .map(|param| {
                let parameter_name = descriptor
                    .as_ref()
                    .and_then(|d| d.parameter_by_field_name(param.field_name()))
                    .map_or(param.field_name(), FilterParamDescriptor::parameter_name);
                JsonDocumentFilterParam::new(
                    parameter_name,
                    param.value().to_json(),
                    param.value_to().to_json(),
                )
            })
            .collect();

        Self::new(filter.filter_id(), parameters)
    }

    /// Filter id
    #[inline]
    #[must_use]
    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// Parameters in wire order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[JsonDocumentFilterParam] {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FilterDescriptor;
    use crate::registry::FilterDescriptorRegistry;
    use docmodel_document::{DocumentFilterParam, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_wire_filter() {
        let filter: JsonDocumentFilter = serde_json::from_value(json!({
            "filterId": "default",
            "parameters": [
                {"parameterName": "Name", "value": "Joe"},
                {"parameterName": "Qty", "value": 1, "valueTo": 10}
            ]
        }))
        .unwrap();
        assert_eq!(filter.filter_id(), "default");
        assert_eq!(filter.parameters()[0].value_to(), &JsonValue::Null);
        assert_eq!(filter.parameters()[1].value_to(), &json!(10));
    }

    #[test]
    fn wrap_registered_maps_names_and_drops_internal() {
        let mut registry = FilterDescriptorRegistry::new();
        registry.register(
            FilterDescriptor::new("byPartner")
                .with_parameter(FilterParamDescriptor::new("Partner", "C_BPartner_ID"))
                .with_internal_parameter(
                    DocumentFilterParam::of_name_value("IsActive", "Y", Value::Null).unwrap(),
                ),
        );

        let filter = DocumentFilter::builder("byPartner")
            .add_parameter(DocumentFilterParam::of_name_value("C_BPartner_ID", 5, Value::Null).unwrap())
            .add_parameter(DocumentFilterParam::of_name_value("IsActive", "Y", Value::Null).unwrap())
            .build()
            .unwrap();

        let wire = JsonDocumentFilter::of(&filter, &registry);
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({
                "filterId": "byPartner",
                "parameters": [{"parameterName": "Partner", "value": 5, "valueTo": null}]
            })
        );
    }

    #[test]
    fn wrap_ad_hoc_uses_field_names() {
        let filter = DocumentFilter::builder("zoom")
            .add_parameter(DocumentFilterParam::of_name_value("C_Order_ID", 100, Value::Null).unwrap())
            .build()
            .unwrap();

        let wire = JsonDocumentFilter::of(&filter, &FilterDescriptorRegistry::new());
        assert_eq!(wire.parameters()[0].parameter_name(), "C_Order_ID");
        assert_eq!(wire.parameters()[0].value(), &json!(100));
    }
}
