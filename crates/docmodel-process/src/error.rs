//! Error types for the process instance cache

use crate::{InstanceId, ProcessId};
use docmodel_document::{DocumentError, RepositoryError};
use std::sync::Arc;

/// Process-level errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Loading an instance into the cache failed
    #[error("cannot load process instance {instance_id}: {source}")]
    CacheLoad {
        /// Instance being loaded
        instance_id: InstanceId,
        /// Loader failure, shared between coalesced callers
        source: Arc<ProcessError>,
    },

    /// No descriptor for the process
    #[error("no process descriptor for process {0}")]
    DescriptorNotFound(ProcessId),

    /// Backing record not found
    #[error("process instance {0} not found")]
    InstanceNotFound(InstanceId),

    /// Backing record store failed
    #[error("process instance store: {0}")]
    Store(String),

    /// Parameters document failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Parameters repository failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ProcessError {
    /// Check if this is a load failure
    #[inline]
    #[must_use]
    pub fn is_cache_load(&self) -> bool {
        matches!(self, Self::CacheLoad { .. })
    }

    /// Innermost error, looking through cache load wrappers
    #[must_use]
    pub fn root_cause(&self) -> &ProcessError {
        match self {
            Self::CacheLoad { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for this schema
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
