//! Filter resolution errors

use docmodel_document::DocumentError;

/// Errors raised while resolving wire filters or loading descriptors
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Required parameter absent from the wire filter
    #[error("parameter '{parameter_name}' of filter '{filter_id}' was not provided")]
    MissingFilterParameter {
        /// Filter id
        filter_id: String,
        /// Descriptor parameter name
        parameter_name: String,
    },

    /// Required parameter present but without value and value-to
    #[error("parameter '{parameter_name}' of filter '{filter_id}' has no value")]
    EmptyFilterParameter {
        /// Filter id
        filter_id: String,
        /// Descriptor parameter name
        parameter_name: String,
    },

    /// Same parameter name sent twice for a registered filter
    #[error("parameter '{parameter_name}' of filter '{filter_id}' was provided more than once")]
    DuplicateFilterParameter {
        /// Filter id
        filter_id: String,
        /// Duplicated parameter name
        parameter_name: String,
    },

    /// Ad-hoc filter parameter without a name
    #[error("ad-hoc filter '{filter_id}' has a parameter without name")]
    MissingParameterName {
        /// Filter id
        filter_id: String,
    },

    /// Filter or predicate could not be built
    #[error(transparent)]
    InvalidFilter(#[from] DocumentError),

    /// Filter descriptors could not be loaded
    #[error("cannot load filter descriptors: {0}")]
    Descriptors(String),
}

impl FilterError {
    /// Caused by the request rather than by server state
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Descriptors(_))
    }

    /// Name of the offending parameter, if any
    #[must_use]
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Self::MissingFilterParameter { parameter_name, .. }
            | Self::EmptyFilterParameter { parameter_name, .. }
            | Self::DuplicateFilterParameter { parameter_name, .. } => Some(parameter_name),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Descriptors(err.to_string())
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        Self::Descriptors(err.to_string())
    }
}

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;
