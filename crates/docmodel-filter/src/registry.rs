//! Filter descriptor registry
//!
//! Provides [`FilterDescriptorRegistry`], an in-memory
//! [`FilterDescriptorProvider`] that can be loaded from YAML.

use crate::descriptor::FilterDescriptor;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Looks up registered filter descriptors by filter id
pub trait FilterDescriptorProvider: Send + Sync {
    /// Descriptor for `filter_id`; `None` means the filter is ad-hoc
    fn filter_descriptor(&self, filter_id: &str) -> Option<Arc<FilterDescriptor>>;
}

/// In-memory filter descriptors keyed by filter id
#[derive(Debug, Default, Clone)]
pub struct FilterDescriptorRegistry {
    descriptors: HashMap<String, Arc<FilterDescriptor>>,
}

impl FilterDescriptorRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load registry from a YAML list of descriptors
    ///
    /// # Errors
    /// Returns [`FilterError::Descriptors`](crate::FilterError::Descriptors)
    /// on malformed YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let descriptors: Vec<FilterDescriptor> = serde_yaml::from_str(yaml)?;
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        tracing::debug!(count = registry.len(), "loaded filter descriptors");
        Ok(registry)
    }

    /// Load registry from a YAML file
    ///
    /// # Errors
    /// Returns [`FilterError::Descriptors`](crate::FilterError::Descriptors)
    /// if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Register descriptor, replacing any previous one with the same id
    pub fn register(&mut self, descriptor: FilterDescriptor) {
        self.descriptors
            .insert(descriptor.filter_id().to_string(), Arc::new(descriptor));
    }

    /// Check if filter id is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, filter_id: &str) -> bool {
        self.descriptors.contains_key(filter_id)
    }

    /// Remove descriptor
    #[inline]
    pub fn remove(&mut self, filter_id: &str) -> bool {
        self.descriptors.remove(filter_id).is_some()
    }

    /// Registered filter ids, sorted
    #[must_use]
    pub fn filter_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
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

impl FilterDescriptorProvider for FilterDescriptorRegistry {
    fn filter_descriptor(&self, filter_id: &str) -> Option<Arc<FilterDescriptor>> {
        self.descriptors.get(filter_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterError;
    use std::io::Write;

    const YAML: &str = r"
- filterId: default
  parameters:
    - parameterName: Name
      fieldName: Name
- filterId: byDate
  parameters:
    - parameterName: DateFrom
      fieldName: DateTrx
      required: true
";

    #[test]
    fn load_from_yaml() {
        let registry = FilterDescriptorRegistry::from_yaml(YAML).unwrap();
        assert_eq!(registry.filter_ids(), vec!["byDate", "default"]);
        assert!(registry.filter_descriptor("byDate").is_some());
        assert!(registry.filter_descriptor("zoom").is_none());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let registry = FilterDescriptorRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn malformed_yaml_is_descriptor_error() {
        let err = FilterDescriptorRegistry::from_yaml("- filterId: [").unwrap_err();
        assert!(matches!(err, FilterError::Descriptors(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn register_and_remove() {
        let mut registry = FilterDescriptorRegistry::new();
        assert!(registry.is_empty());
        registry.register(crate::FilterDescriptor::new("default"));
        assert!(registry.contains("default"));
        assert!(registry.remove("default"));
        assert!(!registry.remove("default"));
    }
}
