//! Error types for suite-data-gen

use thiserror::Error;

/// Result type alias for suite-data-gen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering targets or generating test data
#[derive(Debug, Error)]
pub enum Error {
    /// Requested destination is not in the registry
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    /// A target lacks a field it needs in order to produce cases
    #[error("Incomplete target '{target}': missing {missing}")]
    IncompleteTarget {
        /// Display name of the offending target
        target: String,
        /// Name of the missing field
        missing: &'static str,
    },

    /// A concrete target's input-to-case logic failed
    #[error("Enumeration failed in '{target}': {message}")]
    Enumeration {
        /// Display name of the target whose enumeration failed
        target: String,
        /// Failure detail
        message: String,
    },

    /// Two destination targets declared the same identifier
    #[error("Duplicate destination: {0}")]
    DuplicateDestination(String),

    /// Destination identifier is not usable as a file stem
    #[error("Invalid destination id: {0:?}")]
    InvalidDestinationId(String),

    /// A test case reached the writer without a description or function
    #[error("Incomplete test case: missing {0}")]
    IncompleteCase(&'static str),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Build an enumeration error for `target`
    pub fn enumeration(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Enumeration {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Whether this error signals a defect in the target definitions
    /// (or the run configuration) and must stop the whole run, rather
    /// than only the destination being generated.
    #[must_use]
    pub const fn aborts_run(&self) -> bool {
        matches!(
            self,
            Self::IncompleteTarget { .. }
                | Self::DuplicateDestination(_)
                | Self::InvalidDestinationId(_)
                | Self::Config(_)
        )
    }
}
