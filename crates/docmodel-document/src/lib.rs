//! Document Model
//!
//! Schema-driven, dynamically-typed records and the entity-scoped query
//! layer over them.
//!
//! # Core Concepts
//!
//! - [`EntityDescriptor`] / [`FieldDescriptor`]: immutable schema, shared via `Arc`
//! - [`DocumentField`]: one field's runtime state; every set is coerced to
//!   the field's declared type
//! - [`Document`]: ordered field map with exactly one field per descriptor field
//! - [`DocumentFilter`]: immutable predicate list (field, operator, value, value_to)
//! - [`DocumentQuery`]: immutable query, executed by the repository bound to
//!   its entity descriptor
//! - [`DocumentsRepository`] / [`LookupDataSource`]: external collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use docmodel_document::{Document, DocumentId, DocumentQuery};
//!
//! let mut doc = Document::new(descriptor.clone(), DocumentId(1))?;
//! doc.set_value("Qty", "42")?;
//!
//! let docs = DocumentQuery::builder(descriptor)
//!     .add_filter(filter)
//!     .page_length(20)
//!     .retrieve_documents()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod descriptor;
pub mod document;
pub mod error;
pub mod field;
pub mod filter;
pub mod lookup;
pub mod query;
pub mod repository;

// Re-exports for convenience
pub use descriptor::{
    EntityDescriptor, EntityDescriptorBuilder, EntityDescriptorProvider, EntityDescriptorRegistry,
    FieldDescriptor,
};
pub use document::{Document, DocumentId, DocumentValidStatus, SaveOutcome};
pub use error::{DescriptorError, DocumentError, RepositoryError};
pub use field::DocumentField;
pub use filter::{DocumentFilter, DocumentFilterBuilder, DocumentFilterParam, DocumentFilterParamBuilder, Operator};
pub use lookup::{LookupDataSource, LookupSourceFactory, DEFAULT_PAGE_LENGTH, FIRST_ROW};
pub use query::{DocumentQuery, DocumentQueryBuilder, DocumentQueryOrderBy};
pub use repository::DocumentsRepository;

pub use docmodel_value::{LookupValue, Value, ValueKind, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with documents
    pub use crate::{
        Document, DocumentError, DocumentField, DocumentFilter, DocumentFilterParam, DocumentId,
        DocumentQuery, DocumentsRepository, EntityDescriptor, FieldDescriptor, Operator, Value,
        ValueType,
    };
}
