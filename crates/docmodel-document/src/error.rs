//! Error types for documents, descriptors and repositories
//!
//! Conversion failures and unknown fields are hard errors surfaced to the
//! caller. Repository failures are wrapped so that callers higher up (the
//! process cache's checkin) can decide to swallow them.

use crate::document::DocumentId;
use docmodel_value::{ConversionError, ValueKind, ValueType};

/// Document-level errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Field coercion could not produce the declared type
    #[error("cannot convert {field_name}'s value '{raw}' ({source_kind}) to {target_type}")]
    ValueConversion {
        /// Field being set
        field_name: String,
        /// Raw input, rendered
        raw: String,
        /// Runtime kind of the raw input
        source_kind: ValueKind,
        /// Declared type of the field
        target_type: ValueType,
        /// Underlying conversion failure
        #[source]
        cause: ConversionError,
    },

    /// Field name is not part of the entity descriptor
    #[error("unknown field '{field_name}' in {table_name}")]
    UnknownField {
        /// Entity table name
        table_name: String,
        /// Requested field
        field_name: String,
    },

    /// Entity descriptor has no repository binding
    #[error("no documents repository bound to {table_name}")]
    NoRepository {
        /// Entity table name
        table_name: String,
    },

    /// Malformed filter or filter parameter
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed order-by expression
    #[error("invalid order by: '{0}'")]
    InvalidOrderBy(String),

    /// Repository collaborator failed
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl DocumentError {
    /// Create unknown field error
    pub fn unknown_field(table_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::UnknownField {
            table_name: table_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Check if this is a value conversion failure
    #[inline]
    #[must_use]
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::ValueConversion { .. })
    }
}

/// Errors while building or looking up descriptors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// Entity table name missing
    #[error("entity descriptor requires a table name")]
    EmptyTableName,

    /// Field name declared twice
    #[error("duplicate field '{field_name}' in {table_name}")]
    DuplicateField {
        /// Entity table name
        table_name: String,
        /// Duplicated field
        field_name: String,
    },

    /// Id field not among declared fields
    #[error("id field '{field_name}' is not declared in {table_name}")]
    UnknownIdField {
        /// Entity table name
        table_name: String,
        /// Id field name
        field_name: String,
    },

    /// No descriptor registered for kind
    #[error("no entity descriptor for '{0}'")]
    NotFound(String),
}

/// Errors reported by a [`DocumentsRepository`](crate::DocumentsRepository)
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Record does not exist
    #[error("{table_name} record {id} not found")]
    NotFound {
        /// Entity table name
        table_name: String,
        /// Record id
        id: DocumentId,
    },

    /// Storage backend failure
    #[error("backend failure: {0}")]
    Backend(String),

    /// Stored data could not be turned into a document
    #[error("document error: {0}")]
    Document(#[source] Box<DocumentError>),
}

impl From<DocumentError> for RepositoryError {
    fn from(err: DocumentError) -> Self {
        Self::Document(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_names_field_and_types() {
        let err = DocumentError::ValueConversion {
            field_name: "Qty".to_string(),
            raw: "abc".to_string(),
            source_kind: ValueKind::Text,
            target_type: ValueType::Integer,
            cause: ConversionError::parse(ValueKind::Text, ValueType::Integer, "invalid digit"),
        };
        assert_eq!(
            err.to_string(),
            "cannot convert Qty's value 'abc' (text) to integer"
        );
        assert!(err.is_conversion());
    }

    #[test]
    fn repository_error_conversion() {
        let repo_err = RepositoryError::Backend("connection reset".to_string());
        let doc_err: DocumentError = repo_err.into();
        assert!(matches!(doc_err, DocumentError::Repository(_)));
    }

    #[test]
    fn not_found_display() {
        let err = RepositoryError::NotFound {
            table_name: "AD_PInstance".to_string(),
            id: DocumentId(7),
        };
        assert_eq!(err.to_string(), "AD_PInstance record 7 not found");
    }
}
