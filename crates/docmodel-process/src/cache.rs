//! Process instance checkout/checkin cache using moka
//!
//! The cache holds one read-only canonical copy per instance id. Readers get
//! that copy through `Arc`; writers check out an owned clone and check it
//! back in, which persists it and replaces the canonical copy.
//!
//! # Lifecycle
//!
//! ```text
//! absent --load/create--> cached --get_for_writing--> checked out
//!   ^                       ^                              |
//!   |                       +-----------checkin------------+
//!   +--evict/invalidate/reset (cleanup runs on the removed copy)
//! ```
//!
//! Concurrent checkins of the same id are not serialized: the last one
//! replaces the cached copy.

use crate::config::CacheConfig;
use crate::descriptor::{ProcessDescriptor, ProcessDescriptorProvider};
use crate::error::{ProcessError, Result};
use crate::info::{ProcessInfo, ProcessInstanceStore};
use crate::instance::ProcessInstance;
use crate::{InstanceId, ProcessId};
use docmodel_document::{Document, DocumentError, DocumentId, SaveOutcome};
use moka::notification::RemovalCause;
use moka::sync::Cache;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Cleanup run on a copy removed from the cache
pub type CleanupFn = Arc<dyn Fn(InstanceId, &ProcessInstance) + Send + Sync>;

/// Writable instance, owned by exactly one caller until checked in
#[must_use = "a checked out instance should be checked in"]
pub struct CheckedOut {
    instance: ProcessInstance,
}

impl CheckedOut {
    fn new(instance: ProcessInstance) -> Self {
        Self { instance }
    }

    /// Give up the checkout, keeping the instance
    pub fn into_inner(self) -> ProcessInstance {
        self.instance
    }
}

impl Deref for CheckedOut {
    type Target = ProcessInstance;

    fn deref(&self) -> &ProcessInstance {
        &self.instance
    }
}

impl DerefMut for CheckedOut {
    fn deref_mut(&mut self) -> &mut ProcessInstance {
        &mut self.instance
    }
}

impl fmt::Debug for CheckedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CheckedOut").field(&self.instance).finish()
    }
}

/// What a checkin did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    /// Persisted; cached copy replaced
    Saved,
    /// Nothing to persist; cached copy replaced
    Unchanged,
    /// Not persisted because validation failed; cached copy replaced
    Invalid {
        /// Offending field
        field_name: String,
        /// Human-readable reason
        reason: String,
    },
    /// Persisting failed; cached copy left as it was
    PersistFailed {
        /// Rendered persist error
        reason: String,
    },
}

impl CheckinOutcome {
    /// Checked-in state is now the cached copy
    #[inline]
    #[must_use]
    pub fn is_cached(&self) -> bool {
        !matches!(self, Self::PersistFailed { .. })
    }
}

/// Read-through cache of process instances
#[derive(Clone)]
pub struct ProcessInstancesRepository {
    cache: Cache<InstanceId, Arc<ProcessInstance>>,
    descriptors: Arc<dyn ProcessDescriptorProvider>,
    store: Arc<dyn ProcessInstanceStore>,
}

impl ProcessInstancesRepository {
    /// Create repository whose cleanup calls [`ProcessInstance::destroy`]
    #[must_use]
    pub fn new(
        config: &CacheConfig,
        descriptors: Arc<dyn ProcessDescriptorProvider>,
        store: Arc<dyn ProcessInstanceStore>,
    ) -> Self {
        Self::with_cleanup(
            config,
            descriptors,
            store,
            Arc::new(|_: InstanceId, instance: &ProcessInstance| instance.destroy()),
        )
    }

    /// Create repository with a custom cleanup
    ///
    /// `cleanup` runs on the thread that removes an entry, for capacity and
    /// idle evictions and explicit invalidation. Entries replaced by a
    /// checkin are not cleaned up. It must be idempotent and must not block.
    #[must_use]
    pub fn with_cleanup(
        config: &CacheConfig,
        descriptors: Arc<dyn ProcessDescriptorProvider>,
        store: Arc<dyn ProcessInstanceStore>,
        cleanup: CleanupFn,
    ) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_capacity)
            .eviction_listener(
                move |instance_id: Arc<InstanceId>, instance: Arc<ProcessInstance>, cause| {
                    if cause == RemovalCause::Replaced {
                        return;
                    }
                    tracing::debug!(instance_id = *instance_id, ?cause, "process instance removed");
                    cleanup(*instance_id, &instance);
                },
            );
        if let Some(time_to_idle) = config.time_to_idle() {
            builder = builder.time_to_idle(time_to_idle);
        }

        Self {
            cache: builder.build(),
            descriptors,
            store,
        }
    }

    /// Descriptor of a process
    ///
    /// # Errors
    /// Returns [`ProcessError::DescriptorNotFound`] if the process is unknown
    pub fn process_descriptor(&self, process_id: ProcessId) -> Result<Arc<ProcessDescriptor>> {
        self.descriptors.process_descriptor(process_id)
    }

    /// Cached read-only copy, loading it on miss
    ///
    /// Concurrent misses on the same id share one load.
    ///
    /// # Errors
    /// Returns [`ProcessError::CacheLoad`] if loading fails
    pub fn get_for_reading(&self, instance_id: InstanceId) -> Result<Arc<ProcessInstance>> {
        self.cache
            .try_get_with(instance_id, || self.load(instance_id).map(Arc::new))
            .map_err(|source| ProcessError::CacheLoad {
                instance_id,
                source,
            })
    }

    /// Writable clone of the cached copy
    ///
    /// The cached copy is not affected until the clone is checked in.
    ///
    /// # Errors
    /// Returns [`ProcessError::CacheLoad`] if loading fails
    pub fn get_for_writing(&self, instance_id: InstanceId) -> Result<CheckedOut> {
        let cached = self.get_for_reading(instance_id)?;
        Ok(CheckedOut::new(ProcessInstance::clone(&cached)))
    }

    /// Check in a writable instance
    ///
    /// Saves the parameters if they are valid and changed, then replaces the
    /// cached copy with the checked-in state. A failed save is logged and
    /// leaves the cached copy in place. Never fails.
    pub fn checkin(&self, checked_out: CheckedOut) -> CheckinOutcome {
        let mut instance = checked_out.into_inner();
        let instance_id = instance.instance_id();

        let outcome = match instance.save_if_valid_and_has_changes() {
            Ok(SaveOutcome::Saved) => CheckinOutcome::Saved,
            Ok(SaveOutcome::Unchanged) => CheckinOutcome::Unchanged,
            Ok(SaveOutcome::Invalid { field_name, reason }) => {
                tracing::debug!(instance_id, %field_name, %reason, "checked in invalid parameters");
                CheckinOutcome::Invalid { field_name, reason }
            }
            Err(err) => {
                tracing::warn!(instance_id, error = %err, "cannot save process instance on checkin");
                return CheckinOutcome::PersistFailed {
                    reason: err.to_string(),
                };
            }
        };

        self.cache.insert(instance_id, Arc::new(instance));
        outcome
    }

    /// Create and cache a new instance
    ///
    /// Saves the backing record, builds the parameters document with
    /// descriptor defaults and seeds the cache with a read-only copy.
    ///
    /// # Errors
    /// Returns error if saving the record, finding the descriptor or
    /// creating the parameters document fails
    pub fn create_new_process_instance(&self, mut info: ProcessInfo) -> Result<CheckedOut> {
        let instance_id = self.store.save_process_info(&mut info)?;
        let descriptor = self.process_descriptor(info.process_id())?;

        let parameters_descriptor = descriptor.parameters_descriptor();
        let document_id = DocumentId(instance_id);
        let parameters = match parameters_descriptor.repository() {
            Some(repository) => repository.create_new_document(parameters_descriptor, document_id)?,
            None => Document::new(Arc::clone(parameters_descriptor), document_id)?,
        };

        let instance = ProcessInstance::new(descriptor, instance_id, parameters);
        self.cache.insert(instance_id, Arc::new(instance.clone()));
        tracing::info!(instance_id, process_id = info.process_id(), "created process instance");
        Ok(CheckedOut::new(instance))
    }

    /// Drop one instance from the cache, running its cleanup
    pub fn invalidate(&self, instance_id: InstanceId) {
        self.cache.invalidate(&instance_id);
    }

    /// Drop every instance from the cache, running their cleanups
    ///
    /// A load racing with the reset may repopulate its id afterwards.
    pub fn cache_reset(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        tracing::info!("process instances cache reset");
    }

    /// Check if an instance is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, instance_id: InstanceId) -> bool {
        self.cache.contains_key(&instance_id)
    }

    /// Number of cached instances
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    fn load(&self, instance_id: InstanceId) -> Result<ProcessInstance> {
        let process_id = self.store.retrieve_process_id(instance_id)?;
        let descriptor = self.process_descriptor(process_id)?;

        let parameters_descriptor = descriptor.parameters_descriptor();
        let repository = parameters_descriptor
            .repository()
            .ok_or_else(|| DocumentError::NoRepository {
                table_name: parameters_descriptor.table_name().to_string(),
            })?;
        let parameters =
            repository.retrieve_document_by_id(parameters_descriptor, DocumentId(instance_id))?;

        tracing::debug!(instance_id, process_id, "loaded process instance");
        Ok(ProcessInstance::new(descriptor, instance_id, parameters))
    }
}

impl fmt::Debug for ProcessInstancesRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessInstancesRepository")
            .field("entry_count", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
