//! The registration side of the transport contract.

use http::Method;
use keel_core::{BoxFuture, InitialContext, KeelResult, RequestContext, SharedRequest};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A bound endpoint: runs the full pipeline for one request.
pub type ExecutableHandler =
    Arc<dyn Fn(SharedRequest, InitialContext) -> BoxFuture<'static, KeelResult<RequestContext>> + Send + Sync>;

/// Something that can accept route registrations, such as an HTTP server
/// adapter.
pub trait Transport {
    /// Registers the executable for `method` and `path`.
    ///
    /// `path` uses `{name}` parameter syntax.
    fn register(&mut self, method: Method, path: String, handler: ExecutableHandler);
}

/// An in-process transport keyed by `(method, path)`.
///
/// Useful for tests and for tools that replay requests without a server.
#[derive(Default, Clone)]
pub struct MemoryTransport {
    routes: HashMap<(Method, String), ExecutableHandler>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The executable registered for a route.
    #[must_use]
    pub fn get(&self, method: &Method, path: &str) -> Option<&ExecutableHandler> {
        self.routes.get(&(method.clone(), path.to_string()))
    }

    /// Registered `(method, path)` pairs, sorted.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut keys: Vec<_> = self.routes.keys().cloned().collect();
        keys.sort_by(|a, b| (a.1.as_str(), a.0.as_str()).cmp(&(b.1.as_str(), b.0.as_str())));
        keys
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Runs the executable for a route.
    ///
    /// Returns `None` when no route matches.
    pub async fn call(
        &self,
        method: &Method,
        path: &str,
        request: SharedRequest,
        initial: InitialContext,
    ) -> Option<KeelResult<RequestContext>> {
        let handler = Arc::clone(self.get(method, path)?);
        Some(handler(request, initial).await)
    }
}

impl Transport for MemoryTransport {
    fn register(&mut self, method: Method, path: String, handler: ExecutableHandler) {
        self.routes.insert((method, path), handler);
    }
}

impl fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("routes", &self.routes())
            .finish()
    }
}
