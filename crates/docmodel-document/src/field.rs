//! Document field runtime state
//!
//! Every value that enters a field goes through the conversion table, so the
//! stored value is always `Null` or of the declared type.

use crate::descriptor::FieldDescriptor;
use crate::document::Document;
use crate::error::DocumentError;
use crate::lookup::{LookupDataSource, DEFAULT_PAGE_LENGTH, FIRST_ROW};
use docmodel_value::{convert, LookupResolver, LookupValue, Value, ValueType};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// One field of a [`Document`]
///
/// # Invariants
/// - `value` and `initial_value` are `Null` or of `descriptor.value_type()`
/// - `initial_value` only changes on construction, [`reset`](Self::reset)
///   and [`commit`](Self::commit)
#[derive(Clone)]
pub struct DocumentField {
    descriptor: Arc<FieldDescriptor>,
    initial_value: Value,
    value: Value,
    mandatory: bool,
    readonly: bool,
    displayed: bool,
    lookup_source: Option<Arc<dyn LookupDataSource>>,
}

impl DocumentField {
    /// Create field with null values and the descriptor's default flags
    #[must_use]
    pub fn new(descriptor: Arc<FieldDescriptor>) -> Self {
        let lookup_source = descriptor.create_lookup_source();
        Self {
            mandatory: descriptor.is_mandatory(),
            readonly: descriptor.is_readonly(),
            displayed: descriptor.is_displayed(),
            descriptor,
            initial_value: Value::Null,
            value: Value::Null,
            lookup_source,
        }
    }

    /// Field descriptor
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &Arc<FieldDescriptor> {
        &self.descriptor
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Declared target type
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.descriptor.value_type()
    }

    /// Last committed value
    #[inline]
    #[must_use]
    pub fn initial_value(&self) -> &Value {
        &self.initial_value
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Set current value, coercing it to the declared type
    ///
    /// # Errors
    /// Returns [`DocumentError::ValueConversion`] if the value cannot be
    /// converted; the stored value is left unchanged.
    pub fn set_value(&mut self, raw: impl Into<Value>) -> Result<(), DocumentError> {
        let raw = raw.into();
        self.value = self.convert_to(&raw, self.value_type())?;
        Ok(())
    }

    /// Reset both initial and current value
    ///
    /// # Errors
    /// Returns [`DocumentError::ValueConversion`] if the value cannot be converted
    pub fn reset(&mut self, raw: impl Into<Value>) -> Result<(), DocumentError> {
        let raw = raw.into();
        let converted = self.convert_to(&raw, self.value_type())?;
        self.initial_value = converted.clone();
        self.value = converted;
        Ok(())
    }

    /// Make the current value the committed one
    #[inline]
    pub fn commit(&mut self) {
        self.initial_value = self.value.clone();
    }

    /// Current value differs from the committed one
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.value != self.initial_value
    }

    /// Current value as integer, `default_value` if null
    ///
    /// # Errors
    /// Returns [`DocumentError::ValueConversion`] if the value is not null and
    /// cannot be converted to an integer
    pub fn value_as_int(&self, default_value: i32) -> Result<i32, DocumentError> {
        match self.convert_to(&self.value, ValueType::Integer)? {
            Value::Integer(i) => Ok(i),
            _ => Ok(default_value),
        }
    }

    /// Current value as wire JSON
    #[inline]
    #[must_use]
    pub fn value_as_json(&self) -> JsonValue {
        self.value.to_json()
    }

    /// Mandatory and still null
    #[inline]
    #[must_use]
    pub fn is_missing_mandatory(&self) -> bool {
        self.mandatory && self.value.is_null()
    }

    /// Mandatory flag
    #[inline]
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Override mandatory flag
    #[inline]
    pub fn set_mandatory(&mut self, mandatory: bool) {
        self.mandatory = mandatory;
    }

    /// Readonly flag
    #[inline]
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Override readonly flag
    #[inline]
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    /// Displayed flag
    #[inline]
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Override displayed flag
    #[inline]
    pub fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    /// Lookup listing needs a refresh
    #[inline]
    #[must_use]
    pub fn is_lookup_values_stale(&self) -> bool {
        false
    }

    /// List lookup values for this field, first page
    #[must_use]
    pub fn lookup_values(&self, document: &Document) -> Vec<LookupValue> {
        self.lookup_source.as_ref().map_or_else(Vec::new, |source| {
            source.find_entities(document, None, FIRST_ROW, DEFAULT_PAGE_LENGTH)
        })
    }

    /// List lookup values matching `query`, first page
    #[must_use]
    pub fn lookup_values_for_query(&self, document: &Document, query: &str) -> Vec<LookupValue> {
        self.lookup_source.as_ref().map_or_else(Vec::new, |source| {
            source.find_entities(document, Some(query), FIRST_ROW, DEFAULT_PAGE_LENGTH)
        })
    }

    fn convert_to(&self, raw: &Value, target: ValueType) -> Result<Value, DocumentError> {
        let source = self.lookup_source.as_deref();
        let resolve = move |id: &str| source.and_then(|s| s.find_by_id(id));
        let resolver: Option<&dyn LookupResolver> = match source {
            Some(_) => Some(&resolve),
            None => None,
        };

        tracing::trace!(field = %self.name(), from = ?raw.kind(), to = %target, "converting value");
        convert(raw, target, resolver).map_err(|cause| DocumentError::ValueConversion {
            field_name: self.name().to_string(),
            raw: raw.to_string(),
            source_kind: raw.kind(),
            target_type: target,
            cause,
        })
    }
}

impl PartialEq for DocumentField {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.initial_value == other.initial_value
            && self.value == other.value
            && self.mandatory == other.mandatory
            && self.readonly == other.readonly
            && self.displayed == other.displayed
    }
}

impl fmt::Debug for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentField")
            .field("name", &self.name())
            .field("value", &self.value)
            .field("initial_value", &self.initial_value)
            .field("mandatory", &self.mandatory)
            .field("readonly", &self.readonly)
            .field("displayed", &self.displayed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EntityDescriptor;
    use crate::document::DocumentId;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Partners {
        lookups: AtomicUsize,
    }

    impl LookupDataSource for Partners {
        fn find_by_id(&self, id: &str) -> Option<LookupValue> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match id {
                "1000" => Some(LookupValue::of_int(1000, "G000X")),
                _ => None,
            }
        }

        fn find_entities(
            &self,
            _context: &Document,
            query: Option<&str>,
            first_row: usize,
            page_length: usize,
        ) -> Vec<LookupValue> {
            [LookupValue::of_int(1000, "G000X"), LookupValue::of_int(1001, "Mustermann")]
                .into_iter()
                .filter(|v| query.map_or(true, |q| v.display_name().contains(q)))
                .skip(first_row)
                .take(page_length)
                .collect()
        }
    }

    fn field(value_type: ValueType) -> DocumentField {
        DocumentField::new(Arc::new(FieldDescriptor::new("F", value_type)))
    }

    fn partner_field() -> (DocumentField, Arc<Partners>) {
        let partners = Arc::new(Partners {
            lookups: AtomicUsize::new(0),
        });
        let source = Arc::clone(&partners);
        let descriptor = FieldDescriptor::new("C_BPartner_ID", ValueType::Lookup)
            .with_lookup_source(Arc::new(move || Arc::clone(&source) as Arc<dyn LookupDataSource>));
        (DocumentField::new(Arc::new(descriptor)), partners)
    }

    #[test]
    fn integer_from_text() {
        let mut f = field(ValueType::Integer);
        f.set_value("42").unwrap();
        assert_eq!(f.value(), &Value::Integer(42));
    }

    #[test]
    fn integer_from_garbage_fails_and_keeps_value() {
        let mut f = field(ValueType::Integer);
        f.set_value(7).unwrap();

        let err = f.set_value("abc").unwrap_err();
        match err {
            DocumentError::ValueConversion {
                field_name,
                raw,
                source_kind,
                target_type,
                ..
            } => {
                assert_eq!(field_name, "F");
                assert_eq!(raw, "abc");
                assert_eq!(source_kind, docmodel_value::ValueKind::Text);
                assert_eq!(target_type, ValueType::Integer);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(f.value(), &Value::Integer(7));
    }

    #[test]
    fn empty_text_on_lookup_is_null() {
        let (mut f, partners) = partner_field();
        f.set_value("").unwrap();
        assert_eq!(f.value(), &Value::Null);
        assert_eq!(partners.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn lookup_resolved_through_source() {
        let (mut f, partners) = partner_field();
        f.set_value("1000").unwrap();
        assert_eq!(f.value(), &Value::lookup("1000", "G000X"));
        assert_eq!(partners.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn same_type_does_not_consult_lookup() {
        let (mut f, partners) = partner_field();
        f.set_value(LookupValue::of_int(5, "Five")).unwrap();
        assert_eq!(partners.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn null_sentinel_clears_value() {
        let mut f = field(ValueType::Text);
        f.set_value("x").unwrap();
        f.set_value(Value::Null).unwrap();
        assert!(f.value().is_null());
    }

    #[test]
    fn set_value_never_touches_initial_value() {
        let mut f = field(ValueType::Integer);
        f.reset(1).unwrap();
        f.set_value(2).unwrap();
        assert_eq!(f.initial_value(), &Value::Integer(1));
        assert!(f.has_changes());

        f.commit();
        assert_eq!(f.initial_value(), &Value::Integer(2));
        assert!(!f.has_changes());
    }

    #[test]
    fn value_as_int_default_only_on_null() {
        let mut f = field(ValueType::Text);
        assert_eq!(f.value_as_int(-1).unwrap(), -1);

        f.set_value("15").unwrap();
        assert_eq!(f.value_as_int(-1).unwrap(), 15);

        f.set_value("fifteen").unwrap();
        assert!(f.value_as_int(-1).is_err());
    }

    #[test]
    fn flags_start_from_descriptor_and_can_be_overridden() {
        let descriptor = FieldDescriptor::new("DocStatus", ValueType::Text)
            .with_mandatory(true)
            .with_readonly(true)
            .with_displayed(false);
        let mut f = DocumentField::new(Arc::new(descriptor));
        assert!(f.is_mandatory() && f.is_readonly() && !f.is_displayed());
        assert!(f.is_missing_mandatory());

        f.set_readonly(false);
        f.set_displayed(true);
        f.set_mandatory(false);
        assert!(!f.is_readonly() && f.is_displayed() && !f.is_missing_mandatory());
    }

    #[test]
    fn lookup_listing_uses_document_context() {
        let (f, _partners) = partner_field();
        let descriptor = Arc::new(EntityDescriptor::builder("C_Order").build().unwrap());
        let document = Document::new(descriptor, DocumentId(1)).unwrap();

        assert_eq!(f.lookup_values(&document).len(), 2);
        let matches = f.lookup_values_for_query(&document, "Muster");
        assert_eq!(matches, vec![LookupValue::of_int(1001, "Mustermann")]);
        assert!(!f.is_lookup_values_stale());
    }

    #[test]
    fn json_rendering() {
        let mut f = field(ValueType::Boolean);
        f.set_value("Y").unwrap();
        assert_eq!(f.value_as_json(), serde_json::json!(true));
    }
}
