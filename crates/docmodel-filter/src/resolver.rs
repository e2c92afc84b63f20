//! Wire filter resolution
//!
//! Turns [`JsonDocumentFilter`]s into [`DocumentFilter`]s. Filters whose id
//! is registered are resolved against their descriptor; any other id is an
//! ad-hoc filter whose parameter names are taken as field names.

use crate::descriptor::FilterDescriptor;
use crate::error::{FilterError, Result};
use crate::json::{JsonDocumentFilter, JsonDocumentFilterParam};
use crate::registry::FilterDescriptorProvider;
use docmodel_document::{DocumentFilter, DocumentFilterParam, Value};
use std::collections::HashMap;

/// Resolve a list of wire filters, keeping their order
///
/// # Errors
/// Returns the first resolution error
pub fn unwrap_list(
    json_filters: &[JsonDocumentFilter],
    provider: &dyn FilterDescriptorProvider,
) -> Result<Vec<DocumentFilter>> {
    json_filters
        .iter()
        .map(|json_filter| unwrap(json_filter, provider))
        .collect()
}

/// Resolve one wire filter
///
/// # Errors
/// - [`FilterError::MissingFilterParameter`] if a required parameter is absent
/// - [`FilterError::EmptyFilterParameter`] if a required parameter has no value
/// - [`FilterError::DuplicateFilterParameter`] if a registered filter gets a
///   parameter name twice
/// - [`FilterError::MissingParameterName`] if an ad-hoc parameter has no name
/// - [`FilterError::InvalidFilter`] if the filter id is empty
pub fn unwrap(
    json_filter: &JsonDocumentFilter,
    provider: &dyn FilterDescriptorProvider,
) -> Result<DocumentFilter> {
    let filter = match provider.filter_descriptor(json_filter.filter_id()) {
        Some(descriptor) => unwrap_using_descriptor(json_filter, &descriptor)?,
        None => unwrap_ad_hoc(json_filter)?,
    };

    tracing::debug!(
        filter_id = %filter.filter_id(),
        parameters = filter.parameters().len(),
        "resolved filter"
    );
    Ok(filter)
}

fn unwrap_ad_hoc(json_filter: &JsonDocumentFilter) -> Result<DocumentFilter> {
    let parameters = json_filter
        .parameters()
        .iter()
        .map(|json_param| {
            if json_param.parameter_name().is_empty() {
                return Err(FilterError::MissingParameterName {
                    filter_id: json_filter.filter_id().to_string(),
                });
            }
            Ok(DocumentFilterParam::builder()
                .field_name(json_param.parameter_name())
                .value(Value::from(json_param.value().clone()))
                .value_to(Value::from(json_param.value_to().clone()))
                .build()?)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DocumentFilter::builder(json_filter.filter_id())
        .add_parameters(parameters)
        .build()?)
}

fn unwrap_using_descriptor(
    json_filter: &JsonDocumentFilter,
    descriptor: &FilterDescriptor,
) -> Result<DocumentFilter> {
    let filter_id = json_filter.filter_id();

    let mut json_params: HashMap<&str, &JsonDocumentFilterParam> =
        HashMap::with_capacity(json_filter.parameters().len());
    for json_param in json_filter.parameters() {
        if json_params
            .insert(json_param.parameter_name(), json_param)
            .is_some()
        {
            return Err(FilterError::DuplicateFilterParameter {
                filter_id: filter_id.to_string(),
                parameter_name: json_param.parameter_name().to_string(),
            });
        }
    }

    let mut builder = DocumentFilter::builder(filter_id);
    for param_descriptor in descriptor.parameters() {
        let parameter_name = param_descriptor.parameter_name();

        let Some(json_param) = json_params.get(parameter_name) else {
            if param_descriptor.is_required() {
                return Err(FilterError::MissingFilterParameter {
                    filter_id: filter_id.to_string(),
                    parameter_name: parameter_name.to_string(),
                });
            }
            continue;
        };

        let value = Value::from(json_param.value().clone());
        let value_to = Value::from(json_param.value_to().clone());
        if value.is_null() && value_to.is_null() {
            if param_descriptor.is_required() {
                return Err(FilterError::EmptyFilterParameter {
                    filter_id: filter_id.to_string(),
                    parameter_name: parameter_name.to_string(),
                });
            }
            continue;
        }

        let mut param = DocumentFilterParam::builder()
            .field_name(param_descriptor.field_name())
            .value(value)
            .value_to(value_to);
        if let Some(operator) = param_descriptor.operator() {
            param = param.operator(operator);
        }
        builder = builder.add_parameter(param.build()?);
    }

    builder = builder.add_parameters(descriptor.internal_parameters().iter().cloned());
    Ok(builder.build()?)
}
