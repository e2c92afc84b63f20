//! Process Instance Cache
//!
//! Checkout/checkin lifecycle for process instances on top of a bounded,
//! read-through cache.
//!
//! # Core Concepts
//!
//! - [`ProcessInstancesRepository`]: the cache; readers share the canonical
//!   copy, writers check out an owned clone
//! - [`CheckedOut`]: writable instance held by one caller until checkin
//! - [`ProcessInstanceStore`] / [`ProcessDescriptorProvider`]: external
//!   collaborators for backing records and descriptors
//! - [`CacheConfig`]: capacity and idle expiry, loadable from TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use docmodel_process::{CacheConfig, ProcessInstancesRepository};
//!
//! let repository = ProcessInstancesRepository::new(&CacheConfig::default(), descriptors, store);
//!
//! let mut instance = repository.get_for_writing(instance_id)?;
//! instance.set_parameter_value("DateInvoiced", "2016-11-03")?;
//! repository.checkin(instance);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod info;
pub mod instance;

/// Process instance id
pub type InstanceId = i32;

/// Process id
pub type ProcessId = i32;

// Re-exports for convenience
pub use cache::{CheckedOut, CheckinOutcome, CleanupFn, ProcessInstancesRepository};
pub use config::CacheConfig;
pub use descriptor::{ProcessDescriptor, ProcessDescriptorProvider, ProcessDescriptorRegistry};
pub use error::{ConfigError, ProcessError, Result};
pub use info::{ProcessInfo, ProcessInstanceStore};
pub use instance::ProcessInstance;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
