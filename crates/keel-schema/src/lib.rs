//! # Keel Schema
//!
//! Compiles a practical subset of JSON Schema into reusable validators.
//!
//! - [`Validator`] - A compiled, immutable validator
//! - [`ValidatorSchema`] - The schema document paired with its validator
//! - [`ValidationIssue`] - One failed check, located by path
//!
//! Compilation never fails outright. Malformed schemas degrade to a validator
//! that accepts any value, and the defect is logged at `warn` level.
//!
//! ## Example
//!
//! ```
//! use keel_schema::ValidatorSchema;
//! use serde_json::json;
//!
//! let schema = ValidatorSchema::compile(json!({
//!     "type": "object",
//!     "properties": { "name": { "type": "string", "minLength": 1 } },
//!     "required": ["name"]
//! }));
//!
//! assert!(schema.validate(&json!({ "name": "Ada" })).is_ok());
//! assert!(schema.validate(&json!({})).is_err());
//! ```

#![doc(html_root_url = "https://docs.rs/keel-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compiler;
mod format;
mod issue;

pub use compiler::{SchemaDefect, Validator, ValidatorSchema, ValidationOutcome};
pub use format::StringFormat;
pub use issue::{IssueCode, ValidationIssue};
