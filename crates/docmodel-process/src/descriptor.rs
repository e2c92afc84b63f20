//! Process descriptors

use crate::error::{ProcessError, Result};
use crate::ProcessId;
use docmodel_document::EntityDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Static description of a process and its parameters
#[derive(Debug)]
pub struct ProcessDescriptor {
    process_id: ProcessId,
    name: String,
    parameters_descriptor: Arc<EntityDescriptor>,
}

impl ProcessDescriptor {
    /// Create descriptor
    #[must_use]
    pub fn new(
        process_id: ProcessId,
        name: impl Into<String>,
        parameters_descriptor: Arc<EntityDescriptor>,
    ) -> Self {
        Self {
            process_id,
            name: name.into(),
            parameters_descriptor,
        }
    }

    /// Process id
    #[inline]
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// Process name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema of the parameters document
    #[inline]
    #[must_use]
    pub fn parameters_descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.parameters_descriptor
    }
}

/// Provides process descriptors by process id
pub trait ProcessDescriptorProvider: Send + Sync {
    /// Descriptor for `process_id`
    ///
    /// # Errors
    /// Returns [`ProcessError::DescriptorNotFound`] if the process is unknown
    fn process_descriptor(&self, process_id: ProcessId) -> Result<Arc<ProcessDescriptor>>;
}

/// In-memory process descriptors
#[derive(Debug, Default, Clone)]
pub struct ProcessDescriptorRegistry {
    descriptors: HashMap<ProcessId, Arc<ProcessDescriptor>>,
}

impl ProcessDescriptorRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register descriptor, replacing any previous one for the same process
    pub fn register(&mut self, descriptor: ProcessDescriptor) {
        self.descriptors
            .insert(descriptor.process_id(), Arc::new(descriptor));
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

impl ProcessDescriptorProvider for ProcessDescriptorRegistry {
    fn process_descriptor(&self, process_id: ProcessId) -> Result<Arc<ProcessDescriptor>> {
        self.descriptors
            .get(&process_id)
            .cloned()
            .ok_or(ProcessError::DescriptorNotFound(process_id))
    }
}
