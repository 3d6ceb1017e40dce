//! # Keel Core
//!
//! Core types shared by every Keel crate:
//!
//! - [`KeelError`] - Error taxonomy with HTTP status mapping and envelopes
//! - [`RequestContext`] - Per-run context threaded through the pipeline
//! - [`TransportRequest`] - What a transport must expose to the pipeline
//! - [`HandlerFn`], [`EvaluatorFn`], [`RequestMutator`] - Stage function types
//! - [`Middleware`] - Middleware trait, with [`MiddlewareGroup`] for composition

#![doc(html_root_url = "https://docs.rs/keel-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod fixtures;
mod handler;
mod kind;
mod middleware;
mod transport;

pub use context::{
    value_as_string, ContextPatch, FieldGroup, InitialContext, RequestContext, RequestId,
    StateBag,
};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, KeelError, KeelResult};
pub use handler::{
    evaluator_fn, handler_fn, request_mutator, BoxFuture, EvaluatorFn, HandlerFn, RequestMutator,
};
pub use kind::HandlerKind;
pub use middleware::{FnMiddleware, Middleware, MiddlewareGroup};
pub use transport::{header_object, read_json_body, SharedRequest, TransportRequest};
