//! Error types for Keel.
//!
//! [`KeelError`] is the error type shared by every stage of the execution
//! pipeline and by descriptor finalization. Transports turn a failed
//! execution into a structured rejection with [`KeelError::to_envelope`].

use crate::context::FieldGroup;
use crate::kind::HandlerKind;
use http::StatusCode;
use keel_schema::ValidationIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`KeelError`].
pub type KeelResult<T> = Result<T, KeelError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Descriptor declared inconsistently; surfaces at startup.
    Configuration,
    /// Request data rejected by a compiled validator.
    Validation,
    /// Invalid or missing credentials.
    Authentication,
    /// Permission denied.
    Authorization,
    /// Resource or handler not found.
    NotFound,
    /// Internal failure.
    Internal,
    /// The transport failed to deliver request data.
    Transport,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Configuration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Standard error type for Keel.
///
/// # Example
///
/// ```
/// use keel_core::{KeelError, ErrorCategory};
///
/// fn check_flag(enabled: bool) -> Result<(), KeelError> {
///     if !enabled {
///         return Err(KeelError::authorization("feature disabled"));
///     }
///     Ok(())
/// }
///
/// let err = check_flag(false).unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Authorization);
/// ```
#[derive(Error, Debug)]
pub enum KeelError {
    /// A descriptor failed finalization or registration.
    #[error("Configuration error in {kind} \"{identifier}\": {message}")]
    Configuration {
        /// Kind of the offending descriptor.
        kind: HandlerKind,
        /// Identifier of the offending descriptor.
        identifier: String,
        /// What is wrong.
        message: String,
    },

    /// A field group failed validation.
    #[error("Validation error in {group}: {}", join_issues(.issues))]
    Validation {
        /// Which part of the request was rejected.
        group: FieldGroup,
        /// Every failed check.
        issues: Vec<ValidationIssue>,
    },

    /// Authentication failed.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Authorization denied.
    #[error("Authorization denied: {message}")]
    Authorization {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The transport could not supply request data.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message.
        message: String,
    },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl KeelError {
    /// Creates a configuration error naming a descriptor.
    #[must_use]
    pub fn configuration(
        kind: HandlerKind,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            kind,
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error for a field group.
    #[must_use]
    pub fn validation(group: FieldGroup, issues: Vec<ValidationIssue>) -> Self {
        Self::Validation { group, issues }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::Authorization { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::Transport { .. } => ErrorCategory::Transport,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the field group for validation errors.
    #[must_use]
    pub const fn field_group(&self) -> Option<FieldGroup> {
        match self {
            Self::Validation { group, .. } => Some(*group),
            _ => None,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Authorization { .. } => "AUTHORIZATION_DENIED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
            Self::Transport { .. } => "TRANSPORT_ERROR",
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation { group, issues } => Some(serde_json::json!({
                "group": group,
                "issues": issues,
            })),
            Self::Configuration {
                kind, identifier, ..
            } => Some(serde_json::json!({
                "kind": kind,
                "identifier": identifier,
            })),
            _ => None,
        }
    }
}

/// Serializable error envelope for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_schema::IssueCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            KeelError::validation(FieldGroup::Body, vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            KeelError::authentication("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            KeelError::authorization("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(KeelError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            KeelError::configuration(HandlerKind::Route, "/x", "bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            KeelError::transport("closed").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_configuration_message_names_descriptor() {
        let err = KeelError::configuration(HandlerKind::Task, "send-email", "no handler");
        assert_eq!(
            err.to_string(),
            "Configuration error in task \"send-email\": no handler"
        );
    }

    #[test]
    fn test_validation_envelope() {
        let err = KeelError::validation(
            FieldGroup::Body,
            vec![
                ValidationIssue::new("$.email", IssueCode::InvalidFormat, "invalid email address"),
                ValidationIssue::new("$.age", IssueCode::TooSmall, "value 15 is less than minimum 18"),
            ],
        );
        assert!(err.to_string().contains("invalid email address"));
        assert!(err.to_string().contains("minimum 18"));

        let envelope = err.to_envelope(Some("req-1"));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["category"], "validation");
        assert_eq!(json["error"]["details"]["group"], "body");
        assert_eq!(json["error"]["details"]["issues"][1]["code"], "too_small");
        assert_eq!(json["request_id"], "req-1");
    }

    #[test]
    fn test_internal_keeps_source() {
        use std::error::Error as _;
        let err = KeelError::internal_with_source("db failed", anyhow::anyhow!("connection reset"));
        assert!(err.source().is_some());
        assert!(err.to_envelope(None).error.details.is_none());
    }
}
