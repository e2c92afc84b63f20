//! In-memory process instance store

use dashmap::DashMap;
use docmodel_process::{InstanceId, ProcessError, ProcessId, ProcessInfo, ProcessInstanceStore};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

/// Process instance store with sequential ids
#[derive(Debug)]
pub struct InMemoryProcessStore {
    infos: DashMap<InstanceId, ProcessInfo>,
    next_id: AtomicI32,
    lookups: AtomicUsize,
}

/// First id handed out for new instances
pub const FIRST_INSTANCE_ID: InstanceId = 1_000;

impl InMemoryProcessStore {
    /// Seed an existing instance
    pub fn register(&self, instance_id: InstanceId, process_id: ProcessId) {
        let mut info = ProcessInfo::new(process_id);
        info.set_instance_id(instance_id);
        self.infos.insert(instance_id, info);
    }

    /// Stored record
    pub fn info(&self, instance_id: InstanceId) -> Option<ProcessInfo> {
        self.infos.get(&instance_id).map(|info| info.clone())
    }

    /// Number of `retrieve_process_id` calls
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryProcessStore {
    fn default() -> Self {
        Self {
            infos: DashMap::new(),
            next_id: AtomicI32::new(FIRST_INSTANCE_ID),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl ProcessInstanceStore for InMemoryProcessStore {
    fn save_process_info(&self, info: &mut ProcessInfo) -> docmodel_process::Result<InstanceId> {
        let instance_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        info.set_instance_id(instance_id);
        self.infos.insert(instance_id, info.clone());
        Ok(instance_id)
    }

    fn retrieve_process_id(&self, instance_id: InstanceId) -> docmodel_process::Result<ProcessId> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.infos
            .get(&instance_id)
            .map(|info| info.process_id())
            .ok_or(ProcessError::InstanceNotFound(instance_id))
    }
}
