//! Validation issue types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable code for a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Value has the wrong JSON type.
    InvalidType,
    /// Required property is missing.
    Required,
    /// String shorter than `minLength`.
    TooShort,
    /// String longer than `maxLength`.
    TooLong,
    /// String does not match `pattern`.
    PatternMismatch,
    /// String does not satisfy its `format`.
    InvalidFormat,
    /// Value is not one of the enumerated choices.
    NotInEnum,
    /// Number below `minimum`.
    TooSmall,
    /// Number above `maximum`.
    TooLarge,
    /// Number has a fractional part where an integer is required.
    NotInteger,
    /// Array has fewer than `minItems` elements.
    TooFewItems,
    /// Array has more than `maxItems` elements.
    TooManyItems,
}

impl IssueCode {
    /// Returns the snake_case code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::Required => "required",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::PatternMismatch => "pattern_mismatch",
            Self::InvalidFormat => "invalid_format",
            Self::NotInEnum => "not_in_enum",
            Self::TooSmall => "too_small",
            Self::TooLarge => "too_large",
            Self::NotInteger => "not_integer",
            Self::TooFewItems => "too_few_items",
            Self::TooManyItems => "too_many_items",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed check.
///
/// `path` uses `$` for the root, `.name` for properties and `[i]` for
/// array elements, e.g. `$.items[2].sku`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Location of the offending value.
    pub path: String,
    /// What went wrong.
    pub code: IssueCode,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new issue.
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::new("$.age", IssueCode::TooSmall, "must be >= 18");
        assert_eq!(issue.to_string(), "$.age: must be >= 18");
    }

    #[test]
    fn test_issue_code_serializes_snake_case() {
        let json = serde_json::to_string(&IssueCode::PatternMismatch).unwrap();
        assert_eq!(json, "\"pattern_mismatch\"");
        assert_eq!(IssueCode::PatternMismatch.as_str(), "pattern_mismatch");
    }
}
