//! Middleware trait and composites.
//!
//! A descriptor holds at most one middleware. To run several, compose them
//! into a [`MiddlewareGroup`], which runs its members in insertion order and
//! stops at the first failure.
//!
//! # Example
//!
//! ```
//! use keel_core::{BoxFuture, KeelResult, Middleware, RequestContext};
//!
//! struct Stamp;
//!
//! impl Middleware for Stamp {
//!     fn name(&self) -> &'static str {
//!         "stamp"
//!     }
//!
//!     fn process<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>> {
//!         Box::pin(async move {
//!             ctx.set_field("stamped", true);
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use crate::context::RequestContext;
use crate::error::KeelResult;
use crate::handler::BoxFuture;
use std::sync::Arc;
use tracing::debug;

/// A middleware that runs against the request context before evaluation.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the context. An error aborts the pipeline.
    fn process<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>;
}

/// Adapts an async closure into a [`Middleware`].
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Wraps `func` under the given name.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>> {
        (self.func)(ctx)
    }
}

/// Runs several middleware in order as one.
#[derive(Clone, Default)]
pub struct MiddlewareGroup {
    members: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member.
    #[must_use]
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.members.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared member.
    #[must_use]
    pub fn with_shared(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.members.push(middleware);
        self
    }

    /// Member names in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Middleware for MiddlewareGroup {
    fn name(&self) -> &'static str {
        "group"
    }

    fn process<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>> {
        Box::pin(async move {
            for member in &self.members {
                debug!(middleware = member.name(), "running grouped middleware");
                member.process(ctx).await?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InitialContext;
    use crate::error::KeelError;
    use crate::fixtures::MockRequest;
    use serde_json::{json, Value};

    fn append(name: &'static str) -> impl Middleware {
        FnMiddleware::new(name, move |ctx: &mut RequestContext| {
            Box::pin(async move {
                let mut seen = ctx.field("seen").cloned().unwrap_or_else(|| json!([]));
                if let Value::Array(items) = &mut seen {
                    items.push(json!(name));
                }
                ctx.set_field("seen", seen);
                Ok(())
            })
        })
    }

    fn ctx() -> RequestContext {
        RequestContext::new(MockRequest::new().into_shared(), InitialContext::new())
    }

    #[tokio::test]
    async fn test_group_runs_in_order() {
        let group = MiddlewareGroup::new().with(append("a")).with(append("b"));
        assert_eq!(group.names(), vec!["a", "b"]);

        let mut ctx = ctx();
        group.process(&mut ctx).await.unwrap();
        assert_eq!(ctx.field("seen"), Some(&json!(["a", "b"])));
    }

    #[tokio::test]
    async fn test_group_stops_at_first_failure() {
        let deny = FnMiddleware::new("deny", |_ctx: &mut RequestContext| {
            Box::pin(async move { Err(KeelError::authorization("blocked")) })
        });
        let group = MiddlewareGroup::new()
            .with(append("a"))
            .with(deny)
            .with(append("c"));

        let mut ctx = ctx();
        let err = group.process(&mut ctx).await.unwrap_err();
        assert!(matches!(err, KeelError::Authorization { .. }));
        assert_eq!(ctx.field("seen"), Some(&json!(["a"])));
    }

    #[tokio::test]
    async fn test_empty_group_is_noop() {
        let group = MiddlewareGroup::new();
        assert!(group.is_empty());
        let mut ctx = ctx();
        group.process(&mut ctx).await.unwrap();
        assert!(ctx.fields().is_empty());
    }
}
