//! Property tests for wire filter resolution
//!
//! Tenet: a resolved registered filter always ends with the descriptor's
//! internal predicates, wrapping it back for the wire loses nothing, and an
//! absent required parameter is always reported by name.

use docmodel_document::{DocumentFilterParam, Operator, Value};
use docmodel_filter::{
    unwrap, FilterDescriptor, FilterError, FilterDescriptorRegistry, FilterParamDescriptor, JsonDocumentFilter,
    JsonDocumentFilterParam,
};
use proptest::prelude::*;
use serde_json::Value as JsonValue;

const PARAMETERS: [(&str, &str); 3] = [
    ("Name", "Name"),
    ("Partner", "C_BPartner_ID"),
    ("DateFrom", "DateTrx"),
];

fn registry() -> FilterDescriptorRegistry {
    let mut registry = FilterDescriptorRegistry::new();
    registry.register(
        FilterDescriptor::new("default")
            .with_parameter(FilterParamDescriptor::new("Name", "Name").with_operator(Operator::LikeIgnoreCase))
            .with_parameter(FilterParamDescriptor::new("Partner", "C_BPartner_ID"))
            .with_parameter(FilterParamDescriptor::new("DateFrom", "DateTrx"))
            .with_internal_parameter(
                DocumentFilterParam::of_name_value("IsActive", "Y", Value::Null).unwrap(),
            )
            .with_internal_parameter(
                DocumentFilterParam::builder()
                    .field_name("AD_Client_ID")
                    .operator(Operator::InArray)
                    .value(0)
                    .build()
                    .unwrap(),
            ),
    );
    registry.register(
        FilterDescriptor::new("strict")
            .with_parameter(FilterParamDescriptor::new("Name", "Name"))
            .with_parameter(FilterParamDescriptor::new("Code", "Value").with_required(true)),
    );
    registry
}

fn wire_value() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        "[a-z]{0,6}".prop_map(JsonValue::from),
        any::<i32>().prop_map(JsonValue::from),
        any::<bool>().prop_map(JsonValue::from),
    ]
}

fn wire_filter() -> impl Strategy<Value = JsonDocumentFilter> {
    proptest::collection::vec(proptest::option::of((wire_value(), wire_value())), 3).prop_map(
        |slots| {
            let parameters = slots
                .into_iter()
                .zip(PARAMETERS)
                .filter_map(|(slot, (parameter_name, _))| {
                    slot.map(|(value, value_to)| {
                        JsonDocumentFilterParam::new(parameter_name, value, value_to)
                    })
                })
                .collect();
            JsonDocumentFilter::new("default", parameters)
        },
    )
}

fn strict_filter() -> impl Strategy<Value = JsonDocumentFilter> {
    (
        proptest::option::of((wire_value(), wire_value())),
        proptest::option::of((wire_value(), wire_value())),
    )
        .prop_map(|(name, code)| {
            let parameters = [("Name", name), ("Code", code)]
                .into_iter()
                .filter_map(|(parameter_name, slot)| {
                    slot.map(|(value, value_to)| JsonDocumentFilterParam::new(parameter_name, value, value_to))
                })
                .collect();
            JsonDocumentFilter::new("strict", parameters)
        })
}

proptest! {
    #[test]
    fn prop_internal_parameters_always_appended(json_filter in wire_filter()) {
        let registry = registry();
        let filter = unwrap(&json_filter, &registry).unwrap();

        let params = filter.parameters();
        prop_assert!(params.len() >= 2);
        let tail: Vec<_> = params[params.len() - 2..].iter().map(DocumentFilterParam::field_name).collect();
        prop_assert_eq!(tail, vec!["IsActive", "AD_Client_ID"]);
    }

    #[test]
    fn prop_resolution_is_deterministic(json_filter in wire_filter()) {
        let registry = registry();
        prop_assert_eq!(unwrap(&json_filter, &registry).unwrap(), unwrap(&json_filter, &registry).unwrap());
    }

    #[test]
    fn prop_wrap_then_unwrap_is_identity(json_filter in wire_filter()) {
        let registry = registry();
        let filter = unwrap(&json_filter, &registry).unwrap();

        let rewrapped = JsonDocumentFilter::of(&filter, &registry);
        prop_assert_eq!(unwrap(&rewrapped, &registry).unwrap(), filter);
    }

    #[test]
    fn prop_ad_hoc_keeps_every_parameter(names in proptest::collection::vec("[A-Z][a-z]{1,8}", 0..6)) {
        let parameters = names
            .iter()
            .map(|name| JsonDocumentFilterParam::new(name.as_str(), JsonValue::from(1), JsonValue::Null))
            .collect();
        let filter = unwrap(&JsonDocumentFilter::new("zoom", parameters), &registry()).unwrap();

        let fields: Vec<_> = filter.parameters().iter().map(|p| p.field_name().to_string()).collect();
        prop_assert_eq!(fields, names);
        prop_assert!(filter.parameters().iter().all(|p| p.operator() == Operator::Equal));
    }

    #[test]
    fn prop_absent_required_parameter_is_named(json_filter in strict_filter()) {
        let result = unwrap(&json_filter, &registry());
        let code = json_filter.parameters().iter().find(|p| p.parameter_name() == "Code");

        match code {
            None => {
                let err = result.unwrap_err();
                prop_assert!(matches!(err, FilterError::MissingFilterParameter { .. }), "expected MissingFilterParameter");
                prop_assert_eq!(err.parameter_name(), Some("Code"));
            }
            Some(code) if code.value().is_null() && code.value_to().is_null() => {
                prop_assert!(matches!(result, Err(FilterError::EmptyFilterParameter { .. })), "expected EmptyFilterParameter");
            }
            Some(_) => {
                let filter = result.unwrap();
                prop_assert!(filter.parameter("Value").is_some());
            }
        }
    }
}
