//! Backing records of process instances
//!
//! [`ProcessInfo`] is what gets stored out of band when an instance is
//! created; the store assigns the instance id.

use crate::error::Result;
use crate::{InstanceId, ProcessId};
use serde::{Deserialize, Serialize};

/// Backing record of a process instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    process_id: ProcessId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance_id: Option<InstanceId>,
}

impl ProcessInfo {
    /// Create record for `process_id` without a target
    #[must_use]
    pub fn new(process_id: ProcessId) -> Self {
        Self {
            process_id,
            table_name: None,
            record_id: None,
            instance_id: None,
        }
    }

    /// With target record
    #[must_use]
    pub fn with_record(mut self, table_name: impl Into<String>, record_id: i32) -> Self {
        self.table_name = Some(table_name.into());
        self.record_id = Some(record_id);
        self
    }

    /// Process id
    #[inline]
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// Target table
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Target record
    #[inline]
    #[must_use]
    pub fn record_id(&self) -> Option<i32> {
        self.record_id
    }

    /// Instance id, once saved
    #[inline]
    #[must_use]
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.instance_id
    }

    /// Record the instance id assigned by the store
    pub fn set_instance_id(&mut self, instance_id: InstanceId) {
        self.instance_id = Some(instance_id);
    }
}

/// Store for process instance backing records
#[cfg_attr(test, mockall::automock)]
pub trait ProcessInstanceStore: Send + Sync {
    /// Persist `info`, assign and return its instance id
    ///
    /// # Errors
    /// Returns [`ProcessError::Store`](crate::ProcessError::Store) on backend failure
    fn save_process_info(&self, info: &mut ProcessInfo) -> Result<InstanceId>;

    /// Process id of a stored instance
    ///
    /// # Errors
    /// Returns [`ProcessError::InstanceNotFound`](crate::ProcessError::InstanceNotFound)
    /// if no such instance is stored
    fn retrieve_process_id(&self, instance_id: InstanceId) -> Result<ProcessId>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn info_builders() {
        let mut info = ProcessInfo::new(100).with_record("C_Order", 1_000_001);
        assert_eq!(info.table_name(), Some("C_Order"));
        assert_eq!(info.record_id(), Some(1_000_001));
        assert_eq!(info.instance_id(), None);

        info.set_instance_id(7);
        assert_eq!(info.instance_id(), Some(7));
    }

    #[test]
    fn mocked_store_assigns_id() {
        let mut store = MockProcessInstanceStore::new();
        store.expect_save_process_info().returning(|info| {
            info.set_instance_id(42);
            Ok(42)
        });

        let mut info = ProcessInfo::new(100);
        assert_eq!(store.save_process_info(&mut info).unwrap(), 42);
        assert_eq!(info.instance_id(), Some(42));
    }
}
