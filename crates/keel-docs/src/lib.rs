//! # Keel Docs
//!
//! OpenAPI 3.1 documentation derived from handler descriptors.
//!
//! - [`to_operation`] turns one route descriptor into an operation object
//! - [`OpenApiGenerator`] assembles a whole document from many descriptors
//!
//! Events, crons and tasks have no HTTP surface and are skipped.

#![doc(html_root_url = "https://docs.rs/keel-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod emitter;
mod error;
mod generator;
mod openapi;

pub use emitter::to_operation;
pub use error::{DocsError, DocsResult};
pub use generator::{OpenApiGenerator, OPENAPI_VERSION};
pub use openapi::{
    Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response,
    Server, Tag,
};
