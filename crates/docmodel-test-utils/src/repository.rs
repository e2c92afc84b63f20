//! In-memory documents repository

use dashmap::DashMap;
use docmodel_document::{
    Document, DocumentFilterParam, DocumentId, DocumentQuery, DocumentsRepository, LookupValue,
    Operator, RepositoryError, Value, ValueType,
};
use docmodel_value::convert;
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

type Row = HashMap<String, Value>;

/// Documents repository over a concurrent map, with call counters
#[derive(Debug, Default)]
pub struct InMemoryDocumentsRepository {
    rows: DashMap<(String, DocumentId), Row>,
    loads: AtomicUsize,
    persists: AtomicUsize,
    fail_persist: AtomicBool,
}

impl InMemoryDocumentsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored row
    pub fn insert_row<I, K, V>(&self, table_name: &str, id: DocumentId, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row = values
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.rows.insert((table_name.to_string(), id), row);
    }

    /// Stored value, if any
    pub fn stored_value(&self, table_name: &str, id: DocumentId, field_name: &str) -> Option<Value> {
        self.rows
            .get(&(table_name.to_string(), id))
            .and_then(|row| row.get(field_name).cloned())
    }

    /// Number of retrieve calls
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of successful persists
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }

    /// Make every following persist fail
    pub fn set_fail_persist(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }

    fn matching_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        let descriptor = query.entity_descriptor();
        let table_name = descriptor.table_name();

        let mut documents = Vec::new();
        for entry in self.rows.iter() {
            let (row_table, id) = entry.key();
            if row_table != table_name || query.record_id().is_some_and(|wanted| wanted != *id) {
                continue;
            }
            let values = entry
                .value()
                .iter()
                .filter(|(name, _)| descriptor.field(name).is_some())
                .map(|(name, value)| (name.clone(), value.clone()));
            documents.push(Document::from_values(std::sync::Arc::clone(descriptor), *id, values)?);
        }

        let mut matched = Vec::with_capacity(documents.len());
        for document in documents {
            if matches_filters(&document, query)? {
                matched.push(document);
            }
        }

        matched.sort_by(|a, b| compare_documents(a, b, query));

        let skip = usize::try_from(query.first_row()).unwrap_or(0);
        let take = usize::try_from(query.page_length()).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }
}

impl DocumentsRepository for InMemoryDocumentsRepository {
    fn retrieve_document(&self, query: &DocumentQuery) -> Result<Option<Document>, RepositoryError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching_documents(query)?.into_iter().next())
    }

    fn retrieve_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, RepositoryError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.matching_documents(query)
    }

    fn persist(&self, document: &Document) -> Result<(), RepositoryError> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("persist disabled".to_string()));
        }
        let row = document.values().into_iter().collect();
        self.rows
            .insert((document.table_name().to_string(), document.document_id()), row);
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn compare_documents(a: &Document, b: &Document, query: &DocumentQuery) -> CmpOrdering {
    for order_by in query.order_bys() {
        let (Ok(left), Ok(right)) = (a.value(order_by.field_name()), b.value(order_by.field_name())) else {
            continue;
        };
        let ordering = left.compare(right).unwrap_or(CmpOrdering::Equal);
        let ordering = if order_by.is_ascending() { ordering } else { ordering.reverse() };
        if ordering != CmpOrdering::Equal {
            return ordering;
        }
    }
    a.document_id().cmp(&b.document_id())
}

fn matches_filters(document: &Document, query: &DocumentQuery) -> Result<bool, RepositoryError> {
    for filter in query.filters() {
        for param in filter.parameters() {
            if !matches_param(document, param)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn matches_param(document: &Document, param: &DocumentFilterParam) -> Result<bool, RepositoryError> {
    let field = document.field(param.field_name())?;
    let actual = field.value();
    let value = coerce(param.value(), field.value_type());
    let value_to = coerce(param.value_to(), field.value_type());

    let ordering = actual.compare(&value);
    let equal = ordering.map_or_else(|| actual == &value, CmpOrdering::is_eq);
    let matched = match param.operator() {
        Operator::Equal => equal,
        Operator::NotEqual => !equal,
        Operator::Greater => ordering == Some(CmpOrdering::Greater),
        Operator::GreaterOrEqual => matches!(ordering, Some(CmpOrdering::Greater | CmpOrdering::Equal)),
        Operator::Less => ordering == Some(CmpOrdering::Less),
        Operator::LessOrEqual => matches!(ordering, Some(CmpOrdering::Less | CmpOrdering::Equal)),
        Operator::Between => {
            let above = value.is_null() || matches!(ordering, Some(CmpOrdering::Greater | CmpOrdering::Equal));
            let below = value_to.is_null()
                || matches!(actual.compare(&value_to), Some(CmpOrdering::Less | CmpOrdering::Equal));
            above && below
        }
        Operator::Like => like(&actual.to_string(), &param.value().to_string()),
        Operator::NotLike => !like(&actual.to_string(), &param.value().to_string()),
        Operator::LikeIgnoreCase => like(
            &actual.to_string().to_lowercase(),
            &param.value().to_string().to_lowercase(),
        ),
        Operator::InArray => in_list(actual, param.value()),
        Operator::NotInArray => !in_list(actual, param.value()),
    };
    Ok(matched)
}

fn coerce(value: &Value, target: ValueType) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    if target == ValueType::Lookup {
        return match value {
            Value::Lookup(_) => value.clone(),
            other => Value::Lookup(LookupValue::new(other.to_string(), String::new())),
        };
    }
    convert(value, target, None).unwrap_or_else(|_| value.clone())
}

fn in_list(actual: &Value, list: &Value) -> bool {
    let actual = match actual {
        Value::Lookup(lookup) => lookup.id().to_string(),
        other => other.to_string(),
    };
    list.to_string()
        .split(',')
        .any(|item| item.trim() == actual)
}

fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_at(&text, &pattern)
}

fn like_at(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|i| like_at(&text[i..], rest)),
        Some(('_', rest)) => !text.is_empty() && like_at(&text[1..], rest),
        Some((c, rest)) => text.first() == Some(c) && like_at(&text[1..], rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmodel_document::{DocumentFilter, DocumentQueryOrderBy, EntityDescriptor, FieldDescriptor};
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryDocumentsRepository>, Arc<EntityDescriptor>) {
        let repository = Arc::new(InMemoryDocumentsRepository::new());
        let descriptor = Arc::new(
            EntityDescriptor::builder("C_BPartner")
                .field(FieldDescriptor::new("Name", ValueType::Text))
                .field(FieldDescriptor::new("Qty", ValueType::Integer))
                .repository(repository.clone())
                .build()
                .unwrap(),
        );
        for (id, name, qty) in [(1, "Joe", 5), (2, "Jane", 10), (3, "Bob", 15)] {
            repository.insert_row("C_BPartner", DocumentId(id), [("Name", Value::from(name)), ("Qty", Value::from(qty))]);
        }
        (repository, descriptor)
    }

    fn filter(param: DocumentFilterParam) -> DocumentFilter {
        DocumentFilter::builder("test").add_parameter(param).build().unwrap()
    }

    #[test]
    fn retrieve_by_record_id() {
        let (repository, descriptor) = setup();
        let document = DocumentQuery::of_record_id(descriptor, DocumentId(2))
            .retrieve_document_or_none()
            .unwrap()
            .unwrap();
        assert_eq!(document.value("Name").unwrap(), &Value::text("Jane"));
        assert_eq!(repository.load_count(), 1);
    }

    #[test]
    fn between_with_text_bounds() {
        let (_, descriptor) = setup();
        let documents = DocumentQuery::builder(descriptor)
            .add_filter(filter(DocumentFilterParam::of_name_value("Qty", "6", "15").unwrap()))
            .retrieve_documents()
            .unwrap();
        let ids: Vec<_> = documents.iter().map(Document::document_id).collect();
        assert_eq!(ids, vec![DocumentId(2), DocumentId(3)]);
    }

    #[test]
    fn like_order_and_paging() {
        let (_, descriptor) = setup();
        let param = DocumentFilterParam::builder()
            .field_name("Name")
            .operator(Operator::Like)
            .value("J%")
            .build()
            .unwrap();
        let documents = DocumentQuery::builder(descriptor)
            .add_filter(filter(param))
            .add_order_by(DocumentQueryOrderBy::new("Qty", false))
            .first_row(0)
            .page_length(1)
            .retrieve_documents()
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].value("Name").unwrap(), &Value::text("Jane"));
    }

    #[test]
    fn persist_and_failure_switch() {
        let (repository, descriptor) = setup();
        let mut document = Document::new(descriptor, DocumentId(9)).unwrap();
        document.set_value("Name", "New").unwrap();

        assert!(repository.persist(&document).is_ok());
        assert_eq!(repository.stored_value("C_BPartner", DocumentId(9), "Name"), Some(Value::text("New")));

        repository.set_fail_persist(true);
        assert!(repository.persist(&document).is_err());
        assert_eq!(repository.persist_count(), 1);
    }

    #[test]
    fn like_patterns() {
        assert!(like("Jane", "J_n%"));
        assert!(like("Jane", "%"));
        assert!(!like("Jane", "J_"));
    }
}
