//! Error types for the Flowkit core library
//!
//! The public preview and configuration functions degrade to empty/default
//! values instead of failing. `Error` is returned by the lower-level building
//! blocks (path resolution, JSONPath parsing, workflow parsing) so that
//! callers can catch failures per mapping entry.

use thiserror::Error;

/// Main error type for Flowkit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Path resolution or JSONPath evaluation failed
    #[error("Path error: {message} (path: {path})")]
    Path {
        message: String,
        path: String,
        #[source]
        source: Option<crate::jsonpath::JsonPathError>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Malformed workflow configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Validation errors for inputs
    #[error("Validation error: {field} - {message}")]
    Validation {
        field: String,
        message: String,
        expected: Option<String>,
    },

    /// Unsupported feature or operation
    #[error("Unsupported operation: {message}")]
    Unsupported {
        message: String,
        feature: Option<String>,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error for a missing or malformed field
    pub fn validation(
        field: impl Into<String>,
        message: impl Into<String>,
        expected: Option<&str>,
    ) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
            expected: expected.map(str::to_string),
        }
    }

    /// The path that failed, if this error came from path resolution
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Path { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Configuration {
            message: "missing ui_metadata".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "Configuration error: missing ui_metadata");
    }

    #[test]
    fn test_validation_helper() {
        let err = Error::validation("name", "workflow has no name", Some("non-empty string"));
        assert_eq!(err.to_string(), "Validation error: name - workflow has no name");
        match err {
            Error::Validation { expected, .. } => {
                assert_eq!(expected.as_deref(), Some("non-empty string"))
            }
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.path().is_none());
    }
}
