//! # Keel Handler
//!
//! Declaring and executing endpoints.
//!
//! - [`HandlerDescriptor`] - Builder for one endpoint (route, event, cron or task)
//! - [`Descriptor`] - The finalized, shareable form
//! - [`VersionResolver`] - Picks the handler variant for a request
//! - [`ExecutionPipeline`] - Runs the fixed stage sequence
//! - [`Metadata`] - Introspection snapshot
//!
//! ## Example
//!
//! ```
//! use keel_core::{fixtures::MockRequest, InitialContext, RequestContext};
//! use keel_handler::{ExecutionPipeline, HandlerDescriptor};
//!
//! # tokio_test::block_on(async {
//! let descriptor = HandlerDescriptor::route("GET /ping")
//!     .handler(|ctx: &mut RequestContext| {
//!         Box::pin(async move {
//!             ctx.set_field("pong", true);
//!             Ok(())
//!         })
//!     })
//!     .finalize()
//!     .unwrap();
//!
//! let ctx = ExecutionPipeline::new()
//!     .execute(&descriptor, MockRequest::new().into_shared(), InitialContext::new())
//!     .await
//!     .unwrap();
//! assert_eq!(ctx.field("pong"), Some(&serde_json::json!(true)));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/keel-handler/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod descriptor;
mod metadata;
mod pipeline;
mod route;
mod version;

pub use descriptor::{Descriptor, HandlerDescriptor, ResponseDecl, Validators, VersionEntry};
pub use metadata::{Metadata, ValidationFlags};
pub use pipeline::{ExecutionPipeline, Stage};
pub use route::RouteTarget;
pub use version::{
    select, Resolution, Selected, VersionResolver, DEFAULT_VERSION_HEADER, DEFAULT_VERSION_PARAM,
};
