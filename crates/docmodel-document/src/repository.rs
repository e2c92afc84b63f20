//! Documents repository seam
//!
//! Storage backends implement [`DocumentsRepository`]; descriptors hold one
//! as their data binding.

use crate::descriptor::EntityDescriptor;
use crate::document::{Document, DocumentId};
use crate::error::RepositoryError;
use crate::query::DocumentQuery;
use std::sync::Arc;

/// Storage backend for documents of one or more entities
pub trait DocumentsRepository: Send + Sync {
    /// Retrieve at most one document matching `query`
    ///
    /// # Errors
    /// Returns error on backend failure
    fn retrieve_document(&self, query: &DocumentQuery) -> Result<Option<Document>, RepositoryError>;

    /// Retrieve all documents matching `query`
    ///
    /// # Errors
    /// Returns error on backend failure
    fn retrieve_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError>;

    /// Retrieve the document with `id`
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if no such record exists
    fn retrieve_document_by_id(
        &self,
        entity_descriptor: &Arc<EntityDescriptor>,
        id: DocumentId,
    ) -> Result<Document, RepositoryError> {
        let query = DocumentQuery::of_record_id(Arc::clone(entity_descriptor), id);
        self.retrieve_document(&query)?
            .ok_or_else(|| RepositoryError::NotFound {
                table_name: entity_descriptor.table_name().to_string(),
                id,
            })
    }

    /// Create a new, unsaved document with descriptor defaults
    ///
    /// # Errors
    /// Returns error if a default value cannot be converted
    fn create_new_document(
        &self,
        entity_descriptor: &Arc<EntityDescriptor>,
        id: DocumentId,
    ) -> Result<Document, RepositoryError> {
        Ok(Document::new(Arc::clone(entity_descriptor), id)?)
    }

    /// Persist document's current values
    ///
    /// # Errors
    /// Returns error on backend failure
    fn persist(&self, document: &Document) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use docmodel_value::{Value, ValueType};

    struct SingleRow {
        id: DocumentId,
    }

    impl DocumentsRepository for SingleRow {
        fn retrieve_document(&self, query: &DocumentQuery) -> Result<Option<Document>, RepositoryError> {
            if query.record_id() != Some(self.id) {
                return Ok(None);
            }
            let document = Document::from_values(
                Arc::clone(query.entity_descriptor()),
                self.id,
                [("Name", Value::text("stored"))],
            )?;
            Ok(Some(document))
        }

        fn retrieve_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
            Ok(self.retrieve_document(query)?.into_iter().collect())
        }

        fn persist(&self, _document: &Document) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn descriptor() -> Arc<EntityDescriptor> {
        Arc::new(
            EntityDescriptor::builder("AD_PInstance_Para")
                .field(FieldDescriptor::new("Name", ValueType::Text).with_default_value("new"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn retrieve_by_id_found() {
        let repository = SingleRow { id: DocumentId(3) };
        let document = repository
            .retrieve_document_by_id(&descriptor(), DocumentId(3))
            .unwrap();
        assert_eq!(document.value("Name").unwrap(), &Value::text("stored"));
    }

    #[test]
    fn retrieve_by_id_not_found() {
        let repository = SingleRow { id: DocumentId(3) };
        let err = repository
            .retrieve_document_by_id(&descriptor(), DocumentId(4))
            .unwrap_err();
        assert_eq!(err.to_string(), "AD_PInstance_Para record 4 not found");
    }

    #[test]
    fn create_new_document_uses_defaults() {
        let repository = SingleRow { id: DocumentId(3) };
        let document = repository
            .create_new_document(&descriptor(), DocumentId(10))
            .unwrap();
        assert_eq!(document.document_id(), DocumentId(10));
        assert_eq!(document.value("Name").unwrap(), &Value::text("new"));
    }
}
