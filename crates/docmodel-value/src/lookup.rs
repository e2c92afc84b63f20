//! Lookup values and id resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id + display text pair
///
/// Ids are kept as text; numeric keys are exposed through [`LookupValue::id_as_int`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupValue {
    id: String,
    display_name: String,
}

impl LookupValue {
    /// Create lookup value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Create lookup value with an integer key
    #[inline]
    #[must_use]
    pub fn of_int(id: i32, display_name: impl Into<String>) -> Self {
        Self::new(id.to_string(), display_name)
    }

    /// Get id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get id as integer, if it is one
    #[inline]
    #[must_use]
    pub fn id_as_int(&self) -> Option<i32> {
        self.id.parse().ok()
    }

    /// Get display text
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl fmt::Display for LookupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Resolves lookup ids to lookup values
///
/// Implemented by any `Fn(&str) -> Option<LookupValue>`, so a field can hand
/// its lookup source to the conversion table as a closure.
pub trait LookupResolver {
    /// Find lookup value by id; `None` if the id is unknown
    fn find_by_id(&self, id: &str) -> Option<LookupValue>;
}

impl<F> LookupResolver for F
where
    F: Fn(&str) -> Option<LookupValue>,
{
    fn find_by_id(&self, id: &str) -> Option<LookupValue> {
        self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_as_int_numeric() {
        assert_eq!(LookupValue::of_int(1000, "Partner").id_as_int(), Some(1000));
        assert_eq!(LookupValue::new("DR", "Drafted").id_as_int(), None);
    }

    #[test]
    fn closure_resolves() {
        let resolver = |id: &str| (id == "1").then(|| LookupValue::new("1", "One"));
        assert_eq!(resolver.find_by_id("1").unwrap().display_name(), "One");
        assert!(resolver.find_by_id("2").is_none());
    }
}
