//! Entity and field descriptors
//!
//! Descriptors are loaded elsewhere and never mutated afterwards; documents
//! and fields share them through `Arc`.

use crate::error::DescriptorError;
use crate::lookup::{LookupDataSource, LookupSourceFactory};
use crate::repository::DocumentsRepository;
use docmodel_value::{Value, ValueType};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Static schema of one field
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    value_type: ValueType,
    mandatory: bool,
    displayed: bool,
    readonly: bool,
    default_value: Option<Value>,
    lookup_source_factory: Option<LookupSourceFactory>,
}

impl FieldDescriptor {
    /// Create descriptor; flags default to displayed, optional, editable
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            mandatory: false,
            displayed: true,
            readonly: false,
            default_value: None,
            lookup_source_factory: None,
        }
    }

    /// With mandatory flag
    #[inline]
    #[must_use]
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// With displayed flag
    #[inline]
    #[must_use]
    pub fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// With readonly flag
    #[inline]
    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// With default value for new documents
    #[inline]
    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// With lookup source factory
    #[inline]
    #[must_use]
    pub fn with_lookup_source(mut self, factory: LookupSourceFactory) -> Self {
        self.lookup_source_factory = Some(factory);
        self
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared target type
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Mandatory by default
    #[inline]
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Displayed by default
    #[inline]
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Readonly by default
    #[inline]
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Default value for new documents
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Create a fresh lookup source, if the field has one
    #[must_use]
    pub fn create_lookup_source(&self) -> Option<Arc<dyn LookupDataSource>> {
        self.lookup_source_factory.as_ref().map(|factory| factory())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("mandatory", &self.mandatory)
            .field("displayed", &self.displayed)
            .field("readonly", &self.readonly)
            .field("default_value", &self.default_value)
            .field("lookup", &self.lookup_source_factory.is_some())
            .finish()
    }
}

/// Static schema of one entity
///
/// # Invariants
/// - Field names are unique
/// - The id field, if set, is one of the fields
pub struct EntityDescriptor {
    table_name: String,
    id_field_name: Option<String>,
    fields: IndexMap<String, Arc<FieldDescriptor>>,
    repository: Option<Arc<dyn DocumentsRepository>>,
}

impl EntityDescriptor {
    /// Start building a descriptor for `table_name`
    #[inline]
    #[must_use]
    pub fn builder(table_name: impl Into<String>) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            table_name: table_name.into(),
            id_field_name: None,
            fields: Vec::new(),
            repository: None,
        }
    }

    /// Table name (entity kind)
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Id field name
    #[inline]
    #[must_use]
    pub fn id_field_name(&self) -> Option<&str> {
        self.id_field_name.as_deref()
    }

    /// Field descriptor by name
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.get(name)
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.fields.values()
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Bound documents repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> Option<&Arc<dyn DocumentsRepository>> {
        self.repository.as_ref()
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("table_name", &self.table_name)
            .field("id_field_name", &self.id_field_name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("repository", &self.repository.is_some())
            .finish()
    }
}

/// Builder for [`EntityDescriptor`]
pub struct EntityDescriptorBuilder {
    table_name: String,
    id_field_name: Option<String>,
    fields: Vec<FieldDescriptor>,
    repository: Option<Arc<dyn DocumentsRepository>>,
}

impl EntityDescriptorBuilder {
    /// Set id field
    #[must_use]
    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field_name = Some(name.into());
        self
    }

    /// Add field
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Bind documents repository
    #[must_use]
    pub fn repository(mut self, repository: Arc<dyn DocumentsRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build descriptor
    ///
    /// # Errors
    /// Returns error on empty table name, duplicate fields or an undeclared id field
    pub fn build(self) -> Result<EntityDescriptor, DescriptorError> {
        if self.table_name.is_empty() {
            return Err(DescriptorError::EmptyTableName);
        }

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            let name = field.name().to_string();
            if fields.contains_key(&name) {
                return Err(DescriptorError::DuplicateField {
                    table_name: self.table_name,
                    field_name: name,
                });
            }
            fields.insert(name, Arc::new(field));
        }

        if let Some(id_field) = &self.id_field_name {
            if !fields.contains_key(id_field) {
                return Err(DescriptorError::UnknownIdField {
                    table_name: self.table_name,
                    field_name: id_field.clone(),
                });
            }
        }

        Ok(EntityDescriptor {
            table_name: self.table_name,
            id_field_name: self.id_field_name,
            fields,
            repository: self.repository,
        })
    }
}

/// Provides entity descriptors by kind
pub trait EntityDescriptorProvider: Send + Sync {
    /// Get descriptor for an entity kind
    ///
    /// # Errors
    /// Returns [`DescriptorError::NotFound`] if the kind is unknown
    fn entity_descriptor(&self, kind: &str) -> Result<Arc<EntityDescriptor>, DescriptorError>;
}

/// In-memory descriptor provider keyed by table name
#[derive(Debug, Default, Clone)]
pub struct EntityDescriptorRegistry {
    descriptors: HashMap<String, Arc<EntityDescriptor>>,
}

impl EntityDescriptorRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register descriptor under its table name, replacing any previous one
    pub fn register(&mut self, descriptor: Arc<EntityDescriptor>) {
        self.descriptors
            .insert(descriptor.table_name().to_string(), descriptor);
    }

    /// Check if kind is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.descriptors.contains_key(kind)
    }

    /// Number of registered descriptors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl EntityDescriptorProvider for EntityDescriptorRegistry {
    fn entity_descriptor(&self, kind: &str) -> Result<Arc<EntityDescriptor>, DescriptorError> {
        self.descriptors
            .get(kind)
            .cloned()
            .ok_or_else(|| DescriptorError::NotFound(kind.to_string()))
    }
}
