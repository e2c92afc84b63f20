//! Process instances
//!
//! A [`ProcessInstance`] pairs a process descriptor with the parameters
//! document of one run. Cached copies are shared read-only through `Arc`;
//! writers work on an owned clone obtained through checkout.

use crate::descriptor::ProcessDescriptor;
use crate::{InstanceId, ProcessId};
use docmodel_document::{Document, DocumentError, SaveOutcome, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One run of a process with its parameters
pub struct ProcessInstance {
    descriptor: Arc<ProcessDescriptor>,
    instance_id: InstanceId,
    parameters: Document,
    destroyed: AtomicBool,
}

impl ProcessInstance {
    /// Create instance
    #[must_use]
    pub fn new(descriptor: Arc<ProcessDescriptor>, instance_id: InstanceId, parameters: Document) -> Self {
        Self {
            descriptor,
            instance_id,
            parameters,
            destroyed: AtomicBool::new(false),
        }
    }

    /// Process descriptor
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &Arc<ProcessDescriptor> {
        &self.descriptor
    }

    /// Process id
    #[inline]
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        self.descriptor.process_id()
    }

    /// Instance id
    #[inline]
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Parameters document
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &Document {
        &self.parameters
    }

    /// Mutable parameters document
    #[inline]
    pub fn parameters_mut(&mut self) -> &mut Document {
        &mut self.parameters
    }

    /// Current value of a parameter
    ///
    /// # Errors
    /// Returns [`DocumentError::UnknownField`] if the parameter is not declared
    pub fn parameter_value(&self, name: &str) -> Result<&Value, DocumentError> {
        self.parameters.value(name)
    }

    /// Set a parameter's value (coerced)
    ///
    /// # Errors
    /// Returns error on unknown parameter or failed conversion
    pub fn set_parameter_value(&mut self, name: &str, raw: impl Into<Value>) -> Result<(), DocumentError> {
        self.parameters.set_value(name, raw)
    }

    /// Persist parameters if valid and changed
    ///
    /// # Errors
    /// Returns error if persisting fails
    pub fn save_if_valid_and_has_changes(&mut self) -> Result<SaveOutcome, DocumentError> {
        self.parameters.save_if_valid_and_has_changes()
    }

    /// Release resources held by this copy
    ///
    /// Idempotent; only the first call has an effect.
    pub fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            tracing::debug!(instance_id = self.instance_id, "process instance destroyed");
        }
    }

    /// Check if [`destroy`](Self::destroy) was called on this copy
    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}

// Each copy owns its own lifecycle; a clone starts alive.
impl Clone for ProcessInstance {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.descriptor), self.instance_id, self.parameters.clone())
    }
}

impl fmt::Debug for ProcessInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessInstance")
            .field("process_id", &self.process_id())
            .field("instance_id", &self.instance_id)
            .field("parameters", &self.parameters)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
