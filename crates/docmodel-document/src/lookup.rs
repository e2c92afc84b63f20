//! Lookup sources
//!
//! A lookup source resolves ids to [`LookupValue`]s and lists candidate
//! values for a field. Backends are external; fields only hold the trait
//! object created by their descriptor's factory.

use crate::document::Document;
use docmodel_value::LookupValue;
use std::sync::Arc;

/// First row of a lookup listing
pub const FIRST_ROW: usize = 0;

/// Default lookup page length
pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Lookup value source for one field
pub trait LookupDataSource: Send + Sync {
    /// Find value by id; `None` if unknown
    fn find_by_id(&self, id: &str) -> Option<LookupValue>;

    /// List candidate values
    ///
    /// `context` is the document the field belongs to; `query` narrows the
    /// listing by display text.
    fn find_entities(
        &self,
        context: &Document,
        query: Option<&str>,
        first_row: usize,
        page_length: usize,
    ) -> Vec<LookupValue>;
}

/// Creates the lookup source of a field, once per field instance
pub type LookupSourceFactory = Arc<dyn Fn() -> Arc<dyn LookupDataSource> + Send + Sync>;
