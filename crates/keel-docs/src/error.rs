//! Error types for documentation generation.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the OpenAPI document to JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generator is missing required information.
    #[error("OpenAPI document missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// Two route descriptors map to the same path and method.
    #[error("Duplicate operation for {method} {path}")]
    DuplicateOperation {
        /// HTTP method.
        method: String,
        /// OpenAPI path template.
        path: String,
    },

    /// The route method has no OpenAPI path-item slot.
    #[error("Unsupported HTTP method '{method}' for {path}")]
    UnsupportedMethod {
        /// HTTP method.
        method: String,
        /// OpenAPI path template.
        path: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::SerializationError(_)));
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn test_duplicate_operation_message() {
        let err = DocsError::DuplicateOperation {
            method: "GET".to_string(),
            path: "/users/{id}".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate operation for GET /users/{id}");
    }
}
