//! # Keel
//!
//! Declare an endpoint once (route, event, cron job or task) and get both a
//! request pipeline and its documentation from the same declaration.
//!
//! Each run goes through a fixed sequence of optional stages:
//!
//! ```text
//! mutation → middleware → evaluation → validation → before-hooks → version → handler
//! ```
//!
//! Keel owns no server. A transport supplies requests through
//! [`TransportRequest`](keel_core::TransportRequest) and receives
//! `(method, path, executable)` registrations through [`Transport`].
//!
//! ## Quick Start
//!
//! ```
//! use keel::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut registry = Registry::new();
//! registry
//!     .declare(
//!         HandlerDescriptor::route("POST /users")
//!             .label("createUser")
//!             .validate_body(json!({
//!                 "type": "object",
//!                 "properties": { "email": { "type": "string", "format": "email" } },
//!                 "required": ["email"]
//!             }))
//!             .handler(|ctx: &mut RequestContext| {
//!                 Box::pin(async move {
//!                     ctx.set_field("created", true);
//!                     Ok(())
//!                 })
//!             }),
//!     )
//!     .unwrap();
//!
//! let engine = Engine::new(&KeelConfig::default());
//! let mut transport = MemoryTransport::new();
//! assert_eq!(engine.bind(&registry, &mut transport), 1);
//!
//! let request = MockRequest::new().json(&json!({ "email": "a@b.co" })).into_shared();
//! let ctx = transport
//!     .call(&http::Method::POST, "/users", request, InitialContext::new())
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(ctx.field("created"), Some(&json!(true)));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/keel/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod registry;
mod transport;

pub use engine::Engine;
pub use registry::Registry;
pub use transport::{ExecutableHandler, MemoryTransport, Transport};

pub use keel_config as config;
pub use keel_core as core;
pub use keel_docs as docs;
pub use keel_handler as handler;
pub use keel_schema as schema;
pub use keel_telemetry as telemetry;

pub use keel_handler::{Descriptor, HandlerDescriptor};

/// Prelude module for convenient imports.
///
/// ```
/// use keel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Engine, ExecutableHandler, MemoryTransport, Registry, Transport};

    pub use keel_config::{ConfigLoader, KeelConfig};

    pub use keel_core::fixtures::MockRequest;
    pub use keel_core::{
        BoxFuture, ContextPatch, FieldGroup, FnMiddleware, HandlerKind, InitialContext,
        KeelError, KeelResult, Middleware, MiddlewareGroup, RequestContext, SharedRequest,
        StateBag, TransportRequest,
    };

    pub use keel_docs::{to_operation, OpenApiGenerator};

    pub use keel_handler::{Descriptor, ExecutionPipeline, HandlerDescriptor, Metadata, VersionResolver};

    pub use keel_schema::{IssueCode, ValidationIssue};

    pub use keel_telemetry::{init_logging, LogConfig};
}
