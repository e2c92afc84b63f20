//! Testing utilities for the document model workspace
//!
//! In-memory collaborators with call counters, plus descriptor fixtures.

#![allow(missing_docs)]

pub mod lookup;
pub mod repository;
pub mod store;

pub use lookup::StaticLookupSource;
pub use repository::InMemoryDocumentsRepository;
pub use store::{InMemoryProcessStore, FIRST_INSTANCE_ID};

use docmodel_document::{DocumentId, EntityDescriptor, FieldDescriptor, LookupValue, Value, ValueType};
use docmodel_process::{
    CacheConfig, CleanupFn, InstanceId, ProcessDescriptor, ProcessDescriptorRegistry, ProcessId,
    ProcessInstancesRepository,
};
use std::sync::Arc;

pub const PARAMETERS_TABLE: &str = "AD_PInstance_Para";
pub const TEST_PROCESS_ID: ProcessId = 540_001;

pub fn partners() -> StaticLookupSource {
    StaticLookupSource::new([
        LookupValue::of_int(1, "Joe Block"),
        LookupValue::of_int(2, "Jane Doe"),
        LookupValue::of_int(3, "G. Mustermann"),
    ])
}

/// Parameters schema: `DateInvoiced`, `Qty` (mandatory), `C_BPartner_ID`
/// (lookup) and `IsComplete` (defaults to false)
pub fn create_parameters_descriptor(repository: Arc<InMemoryDocumentsRepository>) -> Arc<EntityDescriptor> {
    let descriptor = EntityDescriptor::builder(PARAMETERS_TABLE)
        .field(FieldDescriptor::new("DateInvoiced", ValueType::Date))
        .field(FieldDescriptor::new("Qty", ValueType::Integer).with_mandatory(true))
        .field(FieldDescriptor::new("C_BPartner_ID", ValueType::Lookup).with_lookup_source(partners().factory()))
        .field(FieldDescriptor::new("IsComplete", ValueType::Boolean).with_default_value("N"))
        .repository(repository)
        .build()
        .unwrap();
    Arc::new(descriptor)
}

/// Collaborators wired for one test process
pub struct ProcessFixture {
    pub documents: Arc<InMemoryDocumentsRepository>,
    pub store: Arc<InMemoryProcessStore>,
    pub descriptors: Arc<ProcessDescriptorRegistry>,
    pub parameters: Arc<EntityDescriptor>,
}

impl ProcessFixture {
    pub fn new() -> Self {
        let documents = Arc::new(InMemoryDocumentsRepository::new());
        let parameters = create_parameters_descriptor(Arc::clone(&documents));

        let mut descriptors = ProcessDescriptorRegistry::new();
        descriptors.register(ProcessDescriptor::new(
            TEST_PROCESS_ID,
            "Generate Invoices",
            Arc::clone(&parameters),
        ));

        Self {
            documents,
            store: Arc::new(InMemoryProcessStore::default()),
            descriptors: Arc::new(descriptors),
            parameters,
        }
    }

    /// Store an existing instance with the given quantity
    pub fn seed_instance(&self, instance_id: InstanceId, qty: i32) {
        self.store.register(instance_id, TEST_PROCESS_ID);
        self.documents.insert_row(
            PARAMETERS_TABLE,
            DocumentId(instance_id),
            [("Qty", Value::from(qty)), ("IsComplete", Value::from("N"))],
        );
    }

    pub fn repository(&self, config: &CacheConfig) -> ProcessInstancesRepository {
        ProcessInstancesRepository::new(config, self.descriptors.clone(), self.store.clone())
    }

    pub fn repository_with_cleanup(&self, config: &CacheConfig, cleanup: CleanupFn) -> ProcessInstancesRepository {
        ProcessInstancesRepository::with_cleanup(config, self.descriptors.clone(), self.store.clone(), cleanup)
    }
}

impl Default for ProcessFixture {
    fn default() -> Self {
        Self::new()
    }
}
