//! Schema-bound documents
//!
//! A [`Document`] owns exactly one [`DocumentField`] per field of its entity
//! descriptor. Documents are plain owned values: sharing happens by cloning
//! or through `Arc` at a higher layer, never through interior mutability.

use crate::descriptor::EntityDescriptor;
use crate::error::DocumentError;
use crate::field::DocumentField;
use docmodel_value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Record id of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub i32);

impl DocumentId {
    /// Integer value
    #[inline]
    #[must_use]
    pub fn to_int(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for DocumentId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Structural validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidStatus {
    /// All constraints hold
    Valid,
    /// First violated constraint
    Invalid {
        /// Offending field
        field_name: String,
        /// Human-readable reason
        reason: String,
    },
}

impl DocumentValidStatus {
    /// Check validity
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// What [`Document::save_if_valid_and_has_changes`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Persisted and committed
    Saved,
    /// Nothing to persist
    Unchanged,
    /// Not persisted because validation failed
    Invalid {
        /// Offending field
        field_name: String,
        /// Human-readable reason
        reason: String,
    },
}

/// Mutable, schema-bound record
#[derive(Clone)]
pub struct Document {
    entity_descriptor: Arc<EntityDescriptor>,
    document_id: DocumentId,
    fields: IndexMap<String, DocumentField>,
}

impl Document {
    /// Create document with one field per descriptor field
    ///
    /// Fields with a default value start with it as both initial and
    /// current value.
    ///
    /// # Errors
    /// Returns error if a default value cannot be converted to its field's type
    pub fn new(
        entity_descriptor: Arc<EntityDescriptor>,
        document_id: DocumentId,
    ) -> Result<Self, DocumentError> {
        let mut fields = IndexMap::with_capacity(entity_descriptor.field_count());
        for descriptor in entity_descriptor.fields() {
            let mut field = DocumentField::new(Arc::clone(descriptor));
            if let Some(default_value) = descriptor.default_value() {
                field.reset(default_value.clone())?;
            }
            fields.insert(descriptor.name().to_string(), field);
        }

        Ok(Self {
            entity_descriptor,
            document_id,
            fields,
        })
    }

    /// Create document from persisted values
    ///
    /// Values become the fields' initial values; fields not mentioned keep
    /// their defaults.
    ///
    /// # Errors
    /// Returns error on unknown field names or unconvertible values
    pub fn from_values<I, K>(
        entity_descriptor: Arc<EntityDescriptor>,
        document_id: DocumentId,
        values: I,
    ) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut document = Self::new(entity_descriptor, document_id)?;
        for (name, value) in values {
            document.field_mut(name.as_ref())?.reset(value)?;
        }
        Ok(document)
    }

    /// Entity descriptor
    #[inline]
    #[must_use]
    pub fn entity_descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.entity_descriptor
    }

    /// Table name of the entity
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.entity_descriptor.table_name()
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Field by name
    ///
    /// # Errors
    /// Returns [`DocumentError::UnknownField`] if the name is not declared
    pub fn field(&self, name: &str) -> Result<&DocumentField, DocumentError> {
        self.fields
            .get(name)
            .ok_or_else(|| DocumentError::unknown_field(self.table_name(), name))
    }

    /// Mutable field by name
    ///
    /// # Errors
    /// Returns [`DocumentError::UnknownField`] if the name is not declared
    pub fn field_mut(&mut self, name: &str) -> Result<&mut DocumentField, DocumentError> {
        let table_name = self.entity_descriptor.table_name();
        self.fields
            .get_mut(name)
            .ok_or_else(|| DocumentError::unknown_field(table_name, name))
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &DocumentField> {
        self.fields.values()
    }

    /// Current value of a field
    ///
    /// # Errors
    /// Returns [`DocumentError::UnknownField`] if the name is not declared
    pub fn value(&self, name: &str) -> Result<&Value, DocumentError> {
        self.field(name).map(DocumentField::value)
    }

    /// Set a field's value (coerced)
    ///
    /// # Errors
    /// Returns error on unknown field or failed conversion
    pub fn set_value(&mut self, name: &str, raw: impl Into<Value>) -> Result<(), DocumentError> {
        self.field_mut(name)?.set_value(raw)
    }

    /// Snapshot of current values in declaration order
    #[must_use]
    pub fn values(&self) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value().clone()))
            .collect()
    }

    /// Any field changed since last commit
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.fields.values().any(DocumentField::has_changes)
    }

    /// Check structural validity (mandatory fields set)
    #[must_use]
    pub fn check_valid(&self) -> DocumentValidStatus {
        self.fields
            .values()
            .find(|field| field.is_missing_mandatory())
            .map_or(DocumentValidStatus::Valid, |field| {
                DocumentValidStatus::Invalid {
                    field_name: field.name().to_string(),
                    reason: format!("mandatory field '{}' has no value", field.name()),
                }
            })
    }

    /// Make current values the committed ones
    pub fn commit(&mut self) {
        for field in self.fields.values_mut() {
            field.commit();
        }
    }

    /// Persist through the bound repository if valid and changed
    ///
    /// Validation failures and "nothing changed" are reported through the
    /// outcome, not as errors.
    ///
    /// # Errors
    /// Returns error if no repository is bound or persisting fails; the
    /// document is not committed in that case
    pub fn save_if_valid_and_has_changes(&mut self) -> Result<SaveOutcome, DocumentError> {
        if let DocumentValidStatus::Invalid { field_name, reason } = self.check_valid() {
            return Ok(SaveOutcome::Invalid { field_name, reason });
        }
        if !self.has_changes() {
            return Ok(SaveOutcome::Unchanged);
        }

        let repository = self
            .entity_descriptor
            .repository()
            .cloned()
            .ok_or_else(|| DocumentError::NoRepository {
                table_name: self.table_name().to_string(),
            })?;
        repository.persist(self)?;

        self.commit();
        tracing::debug!(table = %self.table_name(), id = %self.document_id, "document saved");
        Ok(SaveOutcome::Saved)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.table_name() == other.table_name()
            && self.document_id == other.document_id
            && self.fields == other.fields
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("table_name", &self.table_name())
            .field("document_id", &self.document_id)
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .finish()
    }
}
