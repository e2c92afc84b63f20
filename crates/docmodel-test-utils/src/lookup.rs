//! Fixed-list lookup source

use docmodel_document::{Document, LookupDataSource, LookupSourceFactory, LookupValue};
use std::sync::Arc;

/// Lookup source over a fixed list of values
#[derive(Debug, Clone, Default)]
pub struct StaticLookupSource {
    values: Vec<LookupValue>,
}

impl StaticLookupSource {
    pub fn new(values: impl IntoIterator<Item = LookupValue>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Factory handing out one shared source
    pub fn factory(self) -> LookupSourceFactory {
        let source: Arc<dyn LookupDataSource> = Arc::new(self);
        Arc::new(move || Arc::clone(&source))
    }
}

impl LookupDataSource for StaticLookupSource {
    fn find_by_id(&self, id: &str) -> Option<LookupValue> {
        self.values.iter().find(|value| value.id() == id).cloned()
    }

    fn find_entities(
        &self,
        _context: &Document,
        query: Option<&str>,
        first_row: usize,
        page_length: usize,
    ) -> Vec<LookupValue> {
        let query = query.map(str::to_lowercase);
        self.values
            .iter()
            .filter(|value| {
                query
                    .as_deref()
                    .map_or(true, |q| value.display_name().to_lowercase().contains(q))
            })
            .skip(first_row)
            .take(page_length)
            .cloned()
            .collect()
    }
}
