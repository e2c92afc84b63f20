//! Document queries
//!
//! [`DocumentQuery`] is an immutable value describing what to fetch. It
//! carries no results: execution is delegated to the [`DocumentsRepository`]
//! bound to the query's entity descriptor.

use crate::descriptor::EntityDescriptor;
use crate::document::{Document, DocumentId};
use crate::error::DocumentError;
use crate::filter::DocumentFilter;
use crate::repository::DocumentsRepository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sort key of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQueryOrderBy {
    field_name: String,
    ascending: bool,
}

impl DocumentQueryOrderBy {
    /// Create order by
    #[must_use]
    pub fn new(field_name: impl Into<String>, ascending: bool) -> Self {
        Self {
            field_name: field_name.into(),
            ascending,
        }
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Ascending order
    #[inline]
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Parse a comma separated list like `"+Name,-Created"`
    ///
    /// A missing sign means ascending. Blank input gives an empty list.
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidOrderBy`] on an item without a field name
    pub fn parse_list(s: &str) -> Result<Vec<Self>, DocumentError> {
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }

        s.split(',')
            .map(|item| {
                let item = item.trim();
                let (ascending, name) = match item.as_bytes().first() {
                    Some(b'+') => (true, &item[1..]),
                    Some(b'-') => (false, &item[1..]),
                    _ => (true, item),
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(DocumentError::InvalidOrderBy(item.to_string()));
                }
                Ok(Self::new(name, ascending))
            })
            .collect()
    }
}

impl fmt::Display for DocumentQueryOrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ascending { '+' } else { '-' };
        write!(f, "{sign}{}", self.field_name)
    }
}

/// Immutable query over one entity
#[derive(Clone)]
pub struct DocumentQuery {
    entity_descriptor: Arc<EntityDescriptor>,
    record_id: Option<DocumentId>,
    parent_document: Option<Arc<Document>>,
    filters: Vec<DocumentFilter>,
    order_bys: Vec<DocumentQueryOrderBy>,
    first_row: i32,
    page_length: i32,
}

impl DocumentQuery {
    /// Start building a query for `entity_descriptor`
    #[inline]
    #[must_use]
    pub fn builder(entity_descriptor: Arc<EntityDescriptor>) -> DocumentQueryBuilder {
        DocumentQueryBuilder::new(entity_descriptor)
    }

    /// Query for a single record
    #[must_use]
    pub fn of_record_id(entity_descriptor: Arc<EntityDescriptor>, record_id: DocumentId) -> Self {
        Self::builder(entity_descriptor).record_id(record_id).build()
    }

    /// Entity descriptor
    #[inline]
    #[must_use]
    pub fn entity_descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.entity_descriptor
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn record_id(&self) -> Option<DocumentId> {
        self.record_id
    }

    /// Parent document
    #[inline]
    #[must_use]
    pub fn parent_document(&self) -> Option<&Arc<Document>> {
        self.parent_document.as_ref()
    }

    /// Id of the parent document, if any
    #[must_use]
    pub fn parent_link_id(&self) -> Option<DocumentId> {
        self.parent_document.as_ref().map(|parent| parent.document_id())
    }

    /// Filters in insertion order
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &[DocumentFilter] {
        &self.filters
    }

    /// Order-bys in insertion order
    #[inline]
    #[must_use]
    pub fn order_bys(&self) -> &[DocumentQueryOrderBy] {
        &self.order_bys
    }

    /// First row, `-1` if unbounded
    #[inline]
    #[must_use]
    pub fn first_row(&self) -> i32 {
        self.first_row
    }

    /// Page length, `-1` if unbounded
    #[inline]
    #[must_use]
    pub fn page_length(&self) -> i32 {
        self.page_length
    }

    /// Retrieve at most one document
    ///
    /// # Errors
    /// Returns [`DocumentError::NoRepository`] if the descriptor has no
    /// repository, or the repository's error
    pub fn retrieve_document_or_none(&self) -> Result<Option<Document>, DocumentError> {
        tracing::trace!(query = %self, "retrieve document");
        Ok(self.repository()?.retrieve_document(self)?)
    }

    /// Retrieve all matching documents
    ///
    /// # Errors
    /// Returns [`DocumentError::NoRepository`] if the descriptor has no
    /// repository, or the repository's error
    pub fn retrieve_documents(&self) -> Result<Vec<Document>, DocumentError> {
        tracing::trace!(query = %self, "retrieve documents");
        Ok(self.repository()?.retrieve_documents(self)?)
    }

    fn repository(&self) -> Result<&Arc<dyn DocumentsRepository>, DocumentError> {
        self.entity_descriptor
            .repository()
            .ok_or_else(|| DocumentError::NoRepository {
                table_name: self.entity_descriptor.table_name().to_string(),
            })
    }
}

impl fmt::Display for DocumentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentQuery[table={}", self.entity_descriptor.table_name())?;
        if let Some(record_id) = self.record_id {
            write!(f, ", recordId={record_id}")?;
        }
        if let Some(parent_id) = self.parent_link_id() {
            write!(f, ", parentId={parent_id}")?;
        }
        if !self.filters.is_empty() {
            let filters: Vec<_> = self.filters.iter().map(ToString::to_string).collect();
            write!(f, ", filters=[{}]", filters.join(", "))?;
        }
        if !self.order_bys.is_empty() {
            let order_bys: Vec<_> = self.order_bys.iter().map(ToString::to_string).collect();
            write!(f, ", orderBys={}", order_bys.join(","))?;
        }
        if self.first_row >= 0 {
            write!(f, ", firstRow={}", self.first_row)?;
        }
        if self.page_length >= 0 {
            write!(f, ", pageLength={}", self.page_length)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for DocumentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Builder for [`DocumentQuery`]
///
/// `build` snapshots the current state, so one builder can produce several
/// independent queries.
#[derive(Clone)]
pub struct DocumentQueryBuilder {
    entity_descriptor: Arc<EntityDescriptor>,
    record_id: Option<DocumentId>,
    parent_document: Option<Arc<Document>>,
    filters: Vec<DocumentFilter>,
    order_bys: Vec<DocumentQueryOrderBy>,
    first_row: i32,
    page_length: i32,
}

impl DocumentQueryBuilder {
    fn new(entity_descriptor: Arc<EntityDescriptor>) -> Self {
        Self {
            entity_descriptor,
            record_id: None,
            parent_document: None,
            filters: Vec::new(),
            order_bys: Vec::new(),
            first_row: -1,
            page_length: -1,
        }
    }

    /// Set record id
    #[must_use]
    pub fn record_id(mut self, record_id: DocumentId) -> Self {
        self.record_id = Some(record_id);
        self
    }

    /// Set parent document
    #[must_use]
    pub fn parent_document(mut self, parent: Arc<Document>) -> Self {
        self.parent_document = Some(parent);
        self
    }

    /// Append filter
    #[must_use]
    pub fn add_filter(mut self, filter: DocumentFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append filters
    #[must_use]
    pub fn add_filters(mut self, filters: impl IntoIterator<Item = DocumentFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Append order-by
    #[must_use]
    pub fn add_order_by(mut self, order_by: DocumentQueryOrderBy) -> Self {
        self.order_bys.push(order_by);
        self
    }

    /// Set first row
    #[must_use]
    pub fn first_row(mut self, first_row: i32) -> Self {
        self.first_row = first_row;
        self
    }

    /// Set page length
    #[must_use]
    pub fn page_length(mut self, page_length: i32) -> Self {
        self.page_length = page_length;
        self
    }

    /// Snapshot into an immutable query
    #[must_use]
    pub fn build(&self) -> DocumentQuery {
        DocumentQuery {
            entity_descriptor: Arc::clone(&self.entity_descriptor),
            record_id: self.record_id,
            parent_document: self.parent_document.clone(),
            filters: self.filters.clone(),
            order_bys: self.order_bys.clone(),
            first_row: self.first_row,
            page_length: self.page_length,
        }
    }

    /// Build and retrieve at most one document
    ///
    /// # Errors
    /// See [`DocumentQuery::retrieve_document_or_none`]
    pub fn retrieve_document_or_none(&self) -> Result<Option<Document>, DocumentError> {
        self.build().retrieve_document_or_none()
    }

    /// Build and retrieve all matching documents
    ///
    /// # Errors
    /// See [`DocumentQuery::retrieve_documents`]
    pub fn retrieve_documents(&self) -> Result<Vec<Document>, DocumentError> {
        self.build().retrieve_documents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DocumentFilterParam;
    use docmodel_value::Value;
    use pretty_assertions::assert_eq;

    fn descriptor() -> Arc<EntityDescriptor> {
        Arc::new(EntityDescriptor::builder("C_BPartner").build().unwrap())
    }

    fn filter(id: &str) -> DocumentFilter {
        DocumentFilter::builder(id)
            .add_parameter(DocumentFilterParam::of_name_value("Name", "Joe", Value::Null).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn defaults_are_unset() {
        let query = DocumentQuery::builder(descriptor()).build();
        assert_eq!(query.record_id(), None);
        assert!(query.parent_document().is_none());
        assert!(query.filters().is_empty());
        assert!(query.order_bys().is_empty());
        assert_eq!(query.first_row(), -1);
        assert_eq!(query.page_length(), -1);
        assert_eq!(query.to_string(), "DocumentQuery[table=C_BPartner]");
    }

    #[test]
    fn build_snapshots_builder_state() {
        let builder = DocumentQuery::builder(descriptor()).add_filter(filter("a"));
        let first = builder.build();

        let builder = builder.add_filter(filter("b")).page_length(20);
        let second = builder.build();

        assert_eq!(first.filters().len(), 1);
        assert_eq!(first.page_length(), -1);
        assert_eq!(second.filters().len(), 2);
        assert_eq!(second.page_length(), 20);
    }

    #[test]
    fn duplicate_filters_kept() {
        let query = DocumentQuery::builder(descriptor())
            .add_filters([filter("a"), filter("a")])
            .build();
        assert_eq!(query.filters().len(), 2);
        assert_eq!(query.filters()[0], query.filters()[1]);
    }

    #[test]
    fn parent_link_id_follows_parent() {
        let parent = Arc::new(Document::new(descriptor(), DocumentId(42)).unwrap());
        let query = DocumentQuery::builder(descriptor())
            .parent_document(parent)
            .build();
        assert_eq!(query.parent_link_id(), Some(DocumentId(42)));
    }

    #[test]
    fn display_shows_set_attributes() {
        let query = DocumentQuery::builder(descriptor())
            .record_id(DocumentId(5))
            .add_order_by(DocumentQueryOrderBy::new("Name", false))
            .first_row(0)
            .build();
        assert_eq!(
            query.to_string(),
            "DocumentQuery[table=C_BPartner, recordId=5, orderBys=-Name, firstRow=0]"
        );
    }

    #[test]
    fn retrieve_without_repository_fails() {
        let query = DocumentQuery::of_record_id(descriptor(), DocumentId(1));
        assert!(matches!(
            query.retrieve_document_or_none(),
            Err(DocumentError::NoRepository { ref table_name }) if table_name == "C_BPartner"
        ));
        assert!(query.retrieve_documents().is_err());
    }

    #[test]
    fn parse_order_by_list() {
        let order_bys = DocumentQueryOrderBy::parse_list("+Name, -Created,Value").unwrap();
        assert_eq!(
            order_bys,
            vec![
                DocumentQueryOrderBy::new("Name", true),
                DocumentQueryOrderBy::new("Created", false),
                DocumentQueryOrderBy::new("Value", true),
            ]
        );
        assert!(DocumentQueryOrderBy::parse_list("  ").unwrap().is_empty());
        assert!(matches!(
            DocumentQueryOrderBy::parse_list("+Name,-"),
            Err(DocumentError::InvalidOrderBy(_))
        ));
    }
}
