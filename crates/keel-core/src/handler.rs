//! Function types for the pipeline stages.
//!
//! Every stage function is an `Arc`'d async closure that borrows what it
//! operates on for the duration of its future. Use the constructor helpers
//! to get the closure signatures inferred:
//!
//! ```
//! use keel_core::{handler_fn, KeelResult, RequestContext};
//!
//! let greet = handler_fn(|ctx: &mut RequestContext| {
//!     Box::pin(async move {
//!         ctx.set_field("greeting", "hello");
//!         Ok(())
//!     })
//! });
//! # let _ = greet;
//! ```

use crate::context::{ContextPatch, RequestContext, StateBag};
use crate::error::KeelResult;
use crate::transport::TransportRequest;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A handler or before-hook: runs against the full request context.
pub type HandlerFn =
    Arc<dyn for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>> + Send + Sync>;

/// A state evaluator: runs against the state bag only.
pub type EvaluatorFn =
    Arc<dyn for<'a> Fn(&'a mut StateBag) -> BoxFuture<'a, KeelResult<()>> + Send + Sync>;

/// A request mutator: inspects the raw request and returns a patch.
pub type RequestMutator = Arc<
    dyn for<'a> Fn(&'a dyn TransportRequest) -> BoxFuture<'a, KeelResult<ContextPatch>>
        + Send
        + Sync,
>;

/// Wraps a closure as a [`HandlerFn`].
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as an [`EvaluatorFn`].
pub fn evaluator_fn<F>(f: F) -> EvaluatorFn
where
    F: for<'a> Fn(&'a mut StateBag) -> BoxFuture<'a, KeelResult<()>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as a [`RequestMutator`].
pub fn request_mutator<F>(f: F) -> RequestMutator
where
    F: for<'a> Fn(&'a dyn TransportRequest) -> BoxFuture<'a, KeelResult<ContextPatch>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InitialContext;
    use crate::error::KeelError;
    use crate::fixtures::MockRequest;

    #[tokio::test]
    async fn test_handler_fn_sets_field() {
        let h = handler_fn(|ctx| {
            Box::pin(async move {
                ctx.set_field("status", 201);
                Ok(())
            })
        });
        let mut ctx = RequestContext::new(MockRequest::new().into_shared(), InitialContext::new());
        h(&mut ctx).await.unwrap();
        assert_eq!(ctx.field("status"), Some(&serde_json::json!(201)));
    }

    #[tokio::test]
    async fn test_evaluator_fn_can_reject() {
        let e = evaluator_fn(|state| {
            Box::pin(async move {
                if state.get("user").is_none() {
                    return Err(KeelError::authentication("no user"));
                }
                Ok(())
            })
        });
        let mut state = StateBag::new();
        assert!(e(&mut state).await.is_err());
        state.insert("user".into(), "ada".into());
        assert!(e(&mut state).await.is_ok());
    }

    #[tokio::test]
    async fn test_request_mutator_reads_headers() {
        let m = request_mutator(|req| {
            Box::pin(async move {
                let tenant = req
                    .headers()
                    .get("x-tenant")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                Ok(ContextPatch::new().state("tenant", tenant))
            })
        });
        let req = MockRequest::new().header("x-tenant", "acme");
        let patch = m(&req as &dyn TransportRequest).await.unwrap();
        assert_eq!(patch.state["tenant"], "acme");
    }
}
