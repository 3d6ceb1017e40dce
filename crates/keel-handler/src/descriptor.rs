//! Handler descriptors.
//!
//! Declaring an endpoint is two-phase. A [`HandlerDescriptor`] accumulates
//! configuration through a chain of builder calls; [`HandlerDescriptor::finalize`]
//! checks it and produces an immutable [`Descriptor`] that any number of
//! concurrent pipeline runs can share.
//!
//! # Example
//!
//! ```
//! use keel_handler::HandlerDescriptor;
//! use keel_core::RequestContext;
//! use serde_json::json;
//!
//! let descriptor = HandlerDescriptor::route("POST /users")
//!     .label("createUser")
//!     .tags(["users"])
//!     .validate_body(json!({ "type": "object", "required": ["email"] }))
//!     .handler(|ctx: &mut RequestContext| {
//!         Box::pin(async move {
//!             ctx.set_field("status", 201);
//!             Ok(())
//!         })
//!     })
//!     .finalize()
//!     .unwrap();
//!
//! assert_eq!(descriptor.label(), Some("createUser"));
//! ```

use crate::route::RouteTarget;
use cron::Schedule;
use keel_core::{
    BoxFuture, ContextPatch, EvaluatorFn, FieldGroup, HandlerFn, HandlerKind, KeelError,
    KeelResult, Middleware, RequestContext, RequestMutator, StateBag, TransportRequest,
};
use keel_schema::ValidatorSchema;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// A declared implementation variant.
#[derive(Clone)]
pub struct VersionEntry {
    label: String,
    handler: HandlerFn,
}

impl VersionEntry {
    /// The version label, e.g. `v2`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The handler for this version.
    #[must_use]
    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }
}

impl fmt::Debug for VersionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A declared response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDecl {
    /// HTTP status code.
    pub status: u16,
    /// JSON schema of the response body.
    pub schema: Value,
}

/// Up to one compiled validator per field group.
#[derive(Debug, Clone, Default)]
pub struct Validators {
    body: Option<ValidatorSchema>,
    params: Option<ValidatorSchema>,
    headers: Option<ValidatorSchema>,
}

impl Validators {
    /// Returns the validator for a group.
    #[must_use]
    pub fn get(&self, group: FieldGroup) -> Option<&ValidatorSchema> {
        match group {
            FieldGroup::Body => self.body.as_ref(),
            FieldGroup::Params => self.params.as_ref(),
            FieldGroup::Headers => self.headers.as_ref(),
        }
    }

    fn set(&mut self, group: FieldGroup, schema: ValidatorSchema) {
        match group {
            FieldGroup::Body => self.body = Some(schema),
            FieldGroup::Params => self.params = Some(schema),
            FieldGroup::Headers => self.headers = Some(schema),
        }
    }
}

struct Parts {
    kind: HandlerKind,
    identifier: String,
    label: Option<String>,
    middleware: Option<Arc<dyn Middleware>>,
    evaluator: Option<EvaluatorFn>,
    before_hooks: Vec<HandlerFn>,
    versions: Vec<VersionEntry>,
    base_handler: Option<HandlerFn>,
    validators: Validators,
    request_mutator: Option<RequestMutator>,
    triggers: Vec<String>,
    invokes: Vec<String>,
    tags: Vec<String>,
    description: Option<String>,
    cached: bool,
    responses: Vec<ResponseDecl>,
    route: Option<RouteTarget>,
    schedule: Option<Schedule>,
}

/// Builder for one endpoint's configuration.
#[must_use = "a descriptor does nothing until finalized"]
pub struct HandlerDescriptor {
    parts: Parts,
}

impl HandlerDescriptor {
    /// Starts a descriptor of the given kind.
    pub fn new(kind: HandlerKind, identifier: impl Into<String>) -> Self {
        Self {
            parts: Parts {
                kind,
                identifier: identifier.into(),
                label: None,
                middleware: None,
                evaluator: None,
                before_hooks: Vec::new(),
                versions: Vec::new(),
                base_handler: None,
                validators: Validators::default(),
                request_mutator: None,
                triggers: Vec::new(),
                invokes: Vec::new(),
                tags: Vec::new(),
                description: None,
                cached: false,
                responses: Vec::new(),
                route: None,
                schedule: None,
            },
        }
    }

    /// Starts an HTTP route, e.g. `"POST /users/:id"`.
    pub fn route(identifier: impl Into<String>) -> Self {
        Self::new(HandlerKind::Route, identifier)
    }

    /// Starts an event consumer.
    pub fn event(name: impl Into<String>) -> Self {
        Self::new(HandlerKind::Event, name)
    }

    /// Starts a scheduled job from a 5- or 6-field cron expression.
    pub fn cron(expression: impl Into<String>) -> Self {
        Self::new(HandlerKind::Cron, expression)
    }

    /// Starts a background task.
    pub fn task(name: impl Into<String>) -> Self {
        Self::new(HandlerKind::Task, name)
    }

    /// Sets the composite middleware, replacing any previous one.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.parts.middleware = Some(Arc::new(middleware));
        self
    }

    /// Sets the externally exposed name (RPC address and OpenAPI `operationId`).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.parts.label = Some(label.into());
        self
    }

    /// Sets the state evaluator.
    pub fn evaluate<F>(mut self, evaluator: F) -> Self
    where
        F: for<'a> Fn(&'a mut StateBag) -> BoxFuture<'a, KeelResult<()>> + Send + Sync + 'static,
    {
        self.parts.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Appends a before-hook. Hooks run in declaration order.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.parts.before_hooks.push(Arc::new(hook));
        self
    }

    /// Appends a version. The last declared version is the default.
    pub fn version<F>(mut self, label: impl Into<String>, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.parts.versions.push(VersionEntry {
            label: label.into(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Sets the base handler.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, KeelResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.parts.base_handler = Some(Arc::new(handler));
        self
    }

    /// Sets the base handler from an existing [`HandlerFn`].
    pub fn handler_fn(mut self, handler: HandlerFn) -> Self {
        self.parts.base_handler = Some(handler);
        self
    }

    /// Adds event names this endpoint is triggered by.
    pub fn triggers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.parts.triggers, names);
        self
    }

    /// Adds event names this endpoint emits.
    pub fn invokes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.parts.invokes, names);
        self
    }

    /// Adds documentation tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.parts.description = Some(text.into());
        self
    }

    /// Marks the endpoint as cacheable. Advisory only.
    pub fn cached(mut self) -> Self {
        self.parts.cached = true;
        self
    }

    /// Sets the request mutator, which runs before every other stage.
    pub fn mutate_request<F>(mut self, mutator: F) -> Self
    where
        F: for<'a> Fn(&'a dyn TransportRequest) -> BoxFuture<'a, KeelResult<ContextPatch>>
            + Send
            + Sync
            + 'static,
    {
        self.parts.request_mutator = Some(Arc::new(mutator));
        self
    }

    /// Compiles and stores the body validator.
    pub fn validate_body(self, schema: Value) -> Self {
        self.validate(FieldGroup::Body, schema)
    }

    /// Compiles and stores the params validator.
    pub fn validate_params(self, schema: Value) -> Self {
        self.validate(FieldGroup::Params, schema)
    }

    /// Compiles and stores the headers validator.
    pub fn validate_headers(self, schema: Value) -> Self {
        self.validate(FieldGroup::Headers, schema)
    }

    /// Compiles and stores the validator for a field group.
    pub fn validate(mut self, group: FieldGroup, schema: Value) -> Self {
        self.parts
            .validators
            .set(group, ValidatorSchema::compile(schema));
        self
    }

    /// Declares a response.
    pub fn response(mut self, status: u16, schema: Value) -> Self {
        self.parts.responses.push(ResponseDecl { status, schema });
        self
    }

    /// Checks the declaration and produces an immutable descriptor.
    ///
    /// Fails with a configuration error when neither a base handler nor a
    /// version was declared, when a route identifier does not parse, or when
    /// a cron expression is invalid.
    pub fn finalize(self) -> KeelResult<Descriptor> {
        let mut parts = self.parts;

        if parts.versions.is_empty() && parts.base_handler.is_none() {
            return Err(KeelError::configuration(
                parts.kind,
                parts.identifier,
                "no handler or versions declared",
            ));
        }

        match parts.kind {
            HandlerKind::Route => {
                let target = RouteTarget::parse(&parts.identifier).map_err(|reason| {
                    KeelError::configuration(parts.kind, parts.identifier.clone(), reason)
                })?;
                parts.route = Some(target);
            }
            HandlerKind::Cron => {
                let schedule = parse_schedule(&parts.identifier).map_err(|reason| {
                    KeelError::configuration(parts.kind, parts.identifier.clone(), reason)
                })?;
                parts.schedule = Some(schedule);
            }
            HandlerKind::Event | HandlerKind::Task => {}
        }

        debug!(
            kind = %parts.kind,
            identifier = %parts.identifier,
            label = parts.label.as_deref().unwrap_or(""),
            versions = parts.versions.len(),
            before_hooks = parts.before_hooks.len(),
            has_base_handler = parts.base_handler.is_some(),
            "descriptor finalized"
        );

        Ok(Descriptor {
            inner: Arc::new(parts),
        })
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for name in names {
        let name = name.into();
        if !target.contains(&name) {
            target.push(name);
        }
    }
}

/// Parses a cron expression; 5-field crontab form gets a `0` seconds field.
fn parse_schedule(expression: &str) -> Result<Schedule, String> {
    let expression = expression.trim();
    let normalized = if expression.split_whitespace().count() == 5 {
        format!("0 {expression}")
    } else {
        expression.to_string()
    };
    Schedule::from_str(&normalized).map_err(|e| format!("invalid cron expression: {e}"))
}

/// An immutable, finalized endpoint descriptor.
///
/// Cloning is cheap; all clones share the same configuration.
#[derive(Clone)]
pub struct Descriptor {
    inner: Arc<Parts>,
}

impl Descriptor {
    /// The endpoint kind.
    #[must_use]
    pub fn kind(&self) -> HandlerKind {
        self.inner.kind
    }

    /// The identifier as declared.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// The external label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// The composite middleware.
    #[must_use]
    pub fn middleware(&self) -> Option<&Arc<dyn Middleware>> {
        self.inner.middleware.as_ref()
    }

    /// The state evaluator.
    #[must_use]
    pub fn evaluator(&self) -> Option<&EvaluatorFn> {
        self.inner.evaluator.as_ref()
    }

    /// Before-hooks in declaration order.
    #[must_use]
    pub fn before_hooks(&self) -> &[HandlerFn] {
        &self.inner.before_hooks
    }

    /// Versions in declaration order.
    #[must_use]
    pub fn versions(&self) -> &[VersionEntry] {
        &self.inner.versions
    }

    /// The base handler.
    #[must_use]
    pub fn base_handler(&self) -> Option<&HandlerFn> {
        self.inner.base_handler.as_ref()
    }

    /// All validators.
    #[must_use]
    pub fn validators(&self) -> &Validators {
        &self.inner.validators
    }

    /// The validator for one field group.
    #[must_use]
    pub fn validator(&self, group: FieldGroup) -> Option<&ValidatorSchema> {
        self.inner.validators.get(group)
    }

    /// The request mutator.
    #[must_use]
    pub fn request_mutator(&self) -> Option<&RequestMutator> {
        self.inner.request_mutator.as_ref()
    }

    /// Events that trigger this endpoint.
    #[must_use]
    pub fn triggers(&self) -> &[String] {
        &self.inner.triggers
    }

    /// Events this endpoint emits.
    #[must_use]
    pub fn invokes(&self) -> &[String] {
        &self.inner.invokes
    }

    /// Documentation tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.inner.tags
    }

    /// The description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// Whether the endpoint was marked cacheable.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.inner.cached
    }

    /// Declared responses in declaration order.
    #[must_use]
    pub fn responses(&self) -> &[ResponseDecl] {
        &self.inner.responses
    }

    /// The parsed route, for route descriptors.
    #[must_use]
    pub fn route(&self) -> Option<&RouteTarget> {
        self.inner.route.as_ref()
    }

    /// The parsed schedule, for cron descriptors.
    #[must_use]
    pub fn schedule(&self) -> Option<&Schedule> {
        self.inner.schedule.as_ref()
    }

    /// Returns true if both values share the same configuration.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("kind", &self.kind())
            .field("identifier", &self.identifier())
            .field("label", &self.label())
            .field(
                "versions",
                &self.versions().iter().map(VersionEntry::label).collect::<Vec<_>>(),
            )
            .field("has_base_handler", &self.base_handler().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::ErrorCategory;
    use serde_json::json;

    fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn test_finalize_requires_handler_or_versions() {
        let err = HandlerDescriptor::task("send-email").finalize().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        match err {
            KeelError::Configuration {
                kind, identifier, ..
            } => {
                assert_eq!(kind, HandlerKind::Task);
                assert_eq!(identifier, "send-email");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_versions_alone_are_enough() {
        let d = HandlerDescriptor::route("/users")
            .version("v1", noop)
            .version("v2", noop)
            .finalize()
            .unwrap();
        let labels: Vec<_> = d.versions().iter().map(VersionEntry::label).collect();
        assert_eq!(labels, vec!["v1", "v2"]);
        assert!(d.base_handler().is_none());
    }

    #[test]
    fn test_route_target_parsed() {
        let d = HandlerDescriptor::route("PATCH /users/:id")
            .handler(noop)
            .finalize()
            .unwrap();
        assert_eq!(d.route().unwrap().method(), &http::Method::PATCH);
        assert!(d.schedule().is_none());
    }

    #[test]
    fn test_bad_route_is_configuration_error() {
        let err = HandlerDescriptor::route("users")
            .handler(noop)
            .finalize()
            .unwrap_err();
        assert!(err.to_string().contains("route \"users\""));
    }

    #[test]
    fn test_cron_accepts_five_fields() {
        let d = HandlerDescriptor::cron("*/5 * * * *")
            .handler(noop)
            .finalize()
            .unwrap();
        assert!(d.schedule().is_some());
        assert!(d.route().is_none());
    }

    #[test]
    fn test_invalid_cron_is_configuration_error() {
        let err = HandlerDescriptor::cron("every tuesday")
            .handler(noop)
            .finalize()
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_triggers_and_invokes_deduplicate() {
        let d = HandlerDescriptor::event("user.created")
            .triggers(["a", "a", "b"])
            .invokes(vec!["c".to_string()])
            .handler(noop)
            .finalize()
            .unwrap();
        assert_eq!(d.triggers(), ["a", "b"]);
        assert_eq!(d.invokes(), ["c"]);
    }

    #[test]
    fn test_validators_compiled_eagerly() {
        let d = HandlerDescriptor::route("POST /signup")
            .validate_body(json!({ "type": "object", "required": ["email"] }))
            .validate_headers(json!({ "type": "object" }))
            .handler(noop)
            .finalize()
            .unwrap();
        assert!(d.validator(FieldGroup::Body).is_some());
        assert!(d.validator(FieldGroup::Params).is_none());
        assert!(d
            .validator(FieldGroup::Body)
            .unwrap()
            .validate(&json!({}))
            .is_err());
    }

    #[test]
    fn test_malformed_schema_does_not_fail_declaration() {
        let d = HandlerDescriptor::route("/x")
            .validate_params(json!({ "type": "object", "properties": [] }))
            .handler(noop)
            .finalize()
            .unwrap();
        let v = d.validator(FieldGroup::Params).unwrap();
        assert!(v.validator().accepts_anything());
    }

    #[test]
    fn test_clones_share_configuration() {
        let d = HandlerDescriptor::task("t").handler(noop).cached().finalize().unwrap();
        let c = d.clone();
        assert!(d.ptr_eq(&c));
        assert!(c.is_cached());
    }

    #[test]
    fn test_documentation_fields() {
        let d = HandlerDescriptor::route("GET /users/:id")
            .label("getUser")
            .description("Fetch a user")
            .tags(["users", "public"])
            .response(200, json!({ "type": "object" }))
            .response(404, json!({}))
            .handler(noop)
            .finalize()
            .unwrap();
        assert_eq!(d.description(), Some("Fetch a user"));
        assert_eq!(d.tags(), ["users", "public"]);
        let codes: Vec<_> = d.responses().iter().map(|r| r.status).collect();
        assert_eq!(codes, vec![200, 404]);
    }
}
