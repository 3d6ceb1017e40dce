//! Test fixtures for Keel development and testing.
//!
//! # Example
//!
//! ```
//! use keel_core::fixtures::{self, MockRequest};
//! use keel_core::TransportRequest;
//! use serde_json::json;
//!
//! let req = MockRequest::new()
//!     .header("x-api-version", "v2")
//!     .json(&json!({ "email": "a@b.com" }));
//! assert_eq!(req.headers()["x-api-version"], "v2");
//!
//! let body = fixtures::signup_body_schema();
//! assert_eq!(body["type"], "object");
//! ```

use crate::error::KeelResult;
use crate::handler::BoxFuture;
use crate::transport::{SharedRequest, TransportRequest};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde_json::{json, Value};
use std::sync::Arc;

/// An in-memory transport request.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    headers: HeaderMap,
    body: Bytes,
}

impl MockRequest {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn json(mut self, body: &Value) -> Self {
        self.body = Bytes::from(body.to_string());
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Wraps the request for the pipeline.
    #[must_use]
    pub fn into_shared(self) -> SharedRequest {
        Arc::new(self)
    }
}

impl TransportRequest for MockRequest {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn read_body(&self) -> BoxFuture<'_, KeelResult<Bytes>> {
        let body = self.body.clone();
        Box::pin(async move { Ok(body) })
    }
}

/// Body schema for a signup route: an email plus an adult age.
#[must_use]
pub fn signup_body_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "email": { "type": "string", "format": "email" },
            "age": { "type": "number", "minimum": 18 }
        },
        "required": ["email", "age"]
    })
}

/// Params schema with a required uuid `id` and an optional `expand` flag.
#[must_use]
pub fn id_params_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "expand": { "type": "string", "enum": ["true", "false"] }
        },
        "required": ["id"]
    })
}

/// Response schema for a user resource.
#[must_use]
pub fn user_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "email": { "type": "string", "format": "email" }
        },
        "required": ["id", "email"]
    })
}
