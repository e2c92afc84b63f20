//! Filter Resolution
//!
//! Converts filters received from clients into [`DocumentFilter`]s.
//!
//! # Core Concepts
//!
//! - [`JsonDocumentFilter`]: wire shape `{filterId, parameters: [{parameterName, value, valueTo}]}`
//! - [`FilterDescriptor`]: registered filter; maps parameter names to fields
//!   and carries internal predicates
//! - [`unwrap`] / [`unwrap_list`]: resolve wire filters; unregistered ids are
//!   treated as ad-hoc filters
//!
//! # Example
//!
//! ```rust,ignore
//! use docmodel_filter::{unwrap_list, FilterDescriptorRegistry, JsonDocumentFilter};
//!
//! let registry = FilterDescriptorRegistry::from_yaml(&descriptors_yaml)?;
//! let wire: Vec<JsonDocumentFilter> = serde_json::from_str(&body)?;
//! let filters = unwrap_list(&wire, &registry)?;
//! ```
//!
//! [`DocumentFilter`]: docmodel_document::DocumentFilter

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod descriptor;
pub mod error;
pub mod json;
pub mod registry;
pub mod resolver;

// Re-exports for convenience
pub use descriptor::{FilterDescriptor, FilterParamDescriptor};
pub use error::{FilterError, Result};
pub use json::{JsonDocumentFilter, JsonDocumentFilterParam};
pub use registry::{FilterDescriptorProvider, FilterDescriptorRegistry};
pub use resolver::{unwrap, unwrap_list};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
