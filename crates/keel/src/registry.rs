//! The set of declared endpoints.

use keel_core::{HandlerKind, KeelError, KeelResult};
use keel_docs::{DocsResult, OpenApi, OpenApiGenerator};
use keel_handler::{Descriptor, HandlerDescriptor, Metadata};
use tracing::debug;

/// Finalized descriptors, in declaration order.
///
/// Rejects a second route on the same method and path, a repeated
/// `(kind, identifier)` pair, and a reused label.
///
/// ```
/// use keel::{HandlerDescriptor, Registry};
/// use keel_core::{BoxFuture, KeelResult, RequestContext};
///
/// fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
///     Box::pin(async { Ok(()) })
/// }
///
/// let mut registry = Registry::new();
/// registry.declare(HandlerDescriptor::route("GET /users").handler(noop)).unwrap();
/// assert!(registry.declare(HandlerDescriptor::route("/users").handler(noop)).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes a builder and stores the result.
    pub fn declare(&mut self, builder: HandlerDescriptor) -> KeelResult<Descriptor> {
        self.insert(builder.finalize()?)
    }

    /// Stores an already finalized descriptor.
    pub fn insert(&mut self, descriptor: Descriptor) -> KeelResult<Descriptor> {
        self.check_conflicts(&descriptor)?;
        debug!(
            kind = %descriptor.kind(),
            identifier = descriptor.identifier(),
            "descriptor declared"
        );
        self.descriptors.push(descriptor.clone());
        Ok(descriptor)
    }

    fn check_conflicts(&self, descriptor: &Descriptor) -> KeelResult<()> {
        let conflict = |message: String| {
            KeelError::configuration(descriptor.kind(), descriptor.identifier(), message)
        };

        for existing in &self.descriptors {
            if let (Some(a), Some(b)) = (existing.route(), descriptor.route()) {
                if a.method() == b.method() && a.openapi_path() == b.openapi_path() {
                    return Err(conflict(format!(
                        "route {} {} is already declared as \"{}\"",
                        b.method(),
                        b.openapi_path(),
                        existing.identifier()
                    )));
                }
            }
            if existing.kind() == descriptor.kind()
                && existing.identifier() == descriptor.identifier()
            {
                return Err(conflict("identifier is already declared".to_string()));
            }
            if let (Some(a), Some(b)) = (existing.label(), descriptor.label()) {
                if a == b {
                    return Err(conflict(format!(
                        "label \"{b}\" is already used by {} \"{}\"",
                        existing.kind(),
                        existing.identifier()
                    )));
                }
            }
        }
        Ok(())
    }

    /// All descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Descriptors of one kind.
    pub fn of_kind(&self, kind: HandlerKind) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter().filter(move |d| d.kind() == kind)
    }

    /// Route descriptors.
    pub fn routes(&self) -> impl Iterator<Item = &Descriptor> {
        self.of_kind(HandlerKind::Route)
    }

    /// Event descriptors.
    pub fn events(&self) -> impl Iterator<Item = &Descriptor> {
        self.of_kind(HandlerKind::Event)
    }

    /// Cron descriptors.
    pub fn crons(&self) -> impl Iterator<Item = &Descriptor> {
        self.of_kind(HandlerKind::Cron)
    }

    /// Task descriptors.
    pub fn tasks(&self) -> impl Iterator<Item = &Descriptor> {
        self.of_kind(HandlerKind::Task)
    }

    /// Looks up a descriptor by label.
    #[must_use]
    pub fn find_label(&self, label: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.label() == Some(label))
    }

    /// Looks up by label first, then by identifier.
    ///
    /// An identifier shared by several kinds resolves to the earliest
    /// declaration.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Descriptor> {
        self.find_label(key)
            .or_else(|| self.descriptors.iter().find(|d| d.identifier() == key))
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Metadata snapshots in declaration order.
    #[must_use]
    pub fn metadata(&self) -> Vec<Metadata> {
        self.descriptors.iter().map(Descriptor::metadata).collect()
    }

    /// OpenAPI document covering every route.
    pub fn openapi(&self, generator: &OpenApiGenerator) -> DocsResult<OpenApi> {
        generator.generate(self.routes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{BoxFuture, ErrorCategory, RequestContext};

    fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn sample() -> Registry {
        let mut registry = Registry::new();
        registry
            .declare(HandlerDescriptor::route("GET /users/:id").label("getUser").handler(noop))
            .unwrap();
        registry
            .declare(HandlerDescriptor::route("POST /users").handler(noop))
            .unwrap();
        registry
            .declare(HandlerDescriptor::event("user.created").label("onUserCreated").handler(noop))
            .unwrap();
        registry
            .declare(HandlerDescriptor::cron("0 * * * *").handler(noop))
            .unwrap();
        registry
            .declare(HandlerDescriptor::task("reindex").handler(noop))
            .unwrap();
        registry
    }

    #[test]
    fn test_iterates_by_kind() {
        let registry = sample();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.routes().count(), 2);
        assert_eq!(registry.events().count(), 1);
        assert_eq!(registry.crons().count(), 1);
        assert_eq!(registry.tasks().next().unwrap().identifier(), "reindex");
    }

    #[test]
    fn test_duplicate_route_across_param_styles() {
        let mut registry = sample();
        let err = registry
            .declare(HandlerDescriptor::route("get /users/{id}").handler(noop))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("GET /users/{id}"));
    }

    #[test]
    fn test_same_path_other_method_is_fine() {
        let mut registry = sample();
        assert!(registry
            .declare(HandlerDescriptor::route("DELETE /users/:id").handler(noop))
            .is_ok());
    }

    #[test]
    fn test_duplicate_label() {
        let mut registry = sample();
        let err = registry
            .declare(HandlerDescriptor::task("other").label("getUser").handler(noop))
            .unwrap_err();
        assert!(err.to_string().contains("getUser"));
    }

    #[test]
    fn test_duplicate_identifier_same_kind() {
        let mut registry = sample();
        assert!(registry
            .declare(HandlerDescriptor::event("user.created").handler(noop))
            .is_err());
        // Same identifier under another kind is allowed.
        assert!(registry
            .declare(HandlerDescriptor::task("user.created").handler(noop))
            .is_ok());
    }

    #[test]
    fn test_finalize_error_propagates() {
        let mut registry = Registry::new();
        let err = registry.declare(HandlerDescriptor::task("empty")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find() {
        let registry = sample();
        assert_eq!(registry.find_label("getUser").unwrap().identifier(), "GET /users/:id");
        assert_eq!(registry.find("onUserCreated").unwrap().kind(), HandlerKind::Event);
        assert_eq!(registry.find("reindex").unwrap().kind(), HandlerKind::Task);
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn test_metadata_and_openapi() {
        let registry = sample();
        let metadata = registry.metadata();
        assert_eq!(metadata.len(), 5);
        assert_eq!(metadata[2].label.as_deref(), Some("onUserCreated"));

        let doc = registry
            .openapi(&OpenApiGenerator::new().title("Users").version("1"))
            .unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert!(doc.paths["/users/{id}"].get.is_some());
        assert!(doc.paths["/users"].post.is_some());
    }
}
