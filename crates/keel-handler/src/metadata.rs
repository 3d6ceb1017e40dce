//! Introspection snapshots of finalized descriptors.

use crate::descriptor::{Descriptor, VersionEntry};
use keel_core::{FieldGroup, HandlerKind};
use serde::Serialize;

/// Which validators a descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationFlags {
    /// Body validator present.
    pub body: bool,
    /// Params validator present.
    pub params: bool,
    /// Headers validator present.
    pub headers: bool,
}

/// A read-only summary of a descriptor for tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Endpoint kind.
    pub kind: HandlerKind,
    /// Identifier as declared.
    pub identifier: String,
    /// External label.
    pub label: Option<String>,
    /// Triggering events.
    pub triggers: Vec<String>,
    /// Emitted events.
    pub invokes: Vec<String>,
    /// Documentation tags.
    pub tags: Vec<String>,
    /// Description.
    pub description: Option<String>,
    /// Advisory cache flag.
    pub cached: bool,
    /// Composite middleware present.
    pub has_middleware: bool,
    /// Evaluator present.
    pub has_evaluator: bool,
    /// Number of before-hooks.
    pub before_hooks: usize,
    /// Number of versions.
    pub version_count: usize,
    /// Version labels in declaration order.
    pub versions: Vec<String>,
    /// Base handler present.
    pub has_base_handler: bool,
    /// Declared validators.
    pub validation: ValidationFlags,
    /// Declared response status codes.
    pub responses: Vec<u16>,
}

impl Metadata {
    /// Takes a snapshot of a descriptor. Pure and repeatable.
    #[must_use]
    pub fn snapshot(descriptor: &Descriptor) -> Self {
        Self {
            kind: descriptor.kind(),
            identifier: descriptor.identifier().to_string(),
            label: descriptor.label().map(str::to_owned),
            triggers: descriptor.triggers().to_vec(),
            invokes: descriptor.invokes().to_vec(),
            tags: descriptor.tags().to_vec(),
            description: descriptor.description().map(str::to_owned),
            cached: descriptor.is_cached(),
            has_middleware: descriptor.middleware().is_some(),
            has_evaluator: descriptor.evaluator().is_some(),
            before_hooks: descriptor.before_hooks().len(),
            version_count: descriptor.versions().len(),
            versions: descriptor
                .versions()
                .iter()
                .map(VersionEntry::label)
                .map(str::to_owned)
                .collect(),
            has_base_handler: descriptor.base_handler().is_some(),
            validation: ValidationFlags {
                body: descriptor.validator(FieldGroup::Body).is_some(),
                params: descriptor.validator(FieldGroup::Params).is_some(),
                headers: descriptor.validator(FieldGroup::Headers).is_some(),
            },
            responses: descriptor.responses().iter().map(|r| r.status).collect(),
        }
    }
}

impl Descriptor {
    /// Shorthand for [`Metadata::snapshot`].
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::HandlerDescriptor;
    use keel_core::{BoxFuture, FnMiddleware, KeelResult, RequestContext};
    use serde_json::json;

    fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn test_event_snapshot() {
        let d = HandlerDescriptor::event("order.placed")
            .triggers(["a"])
            .invokes(["b"])
            .handler(noop)
            .finalize()
            .unwrap();
        let m = d.metadata();
        assert_eq!(m.triggers, vec!["a"]);
        assert_eq!(m.invokes, vec!["b"]);
        assert!(m.has_base_handler);
        assert_eq!(m.version_count, 0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let d = HandlerDescriptor::route("POST /users")
            .label("createUser")
            .middleware(FnMiddleware::new("noop", noop))
            .before(noop)
            .before(noop)
            .version("v1", noop)
            .version("v2", noop)
            .validate_body(json!({ "type": "object" }))
            .response(201, json!({}))
            .cached()
            .finalize()
            .unwrap();

        let json = serde_json::to_value(d.metadata()).unwrap();
        assert_eq!(json["kind"], "route");
        assert_eq!(json["label"], "createUser");
        assert_eq!(json["hasMiddleware"], true);
        assert_eq!(json["hasEvaluator"], false);
        assert_eq!(json["beforeHooks"], 2);
        assert_eq!(json["versionCount"], 2);
        assert_eq!(json["versions"], json!(["v1", "v2"]));
        assert_eq!(json["hasBaseHandler"], false);
        assert_eq!(json["validation"], json!({ "body": true, "params": false, "headers": false }));
        assert_eq!(json["responses"], json!([201]));
        assert_eq!(json["cached"], true);
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let d = HandlerDescriptor::task("t").handler(noop).finalize().unwrap();
        assert_eq!(d.metadata(), d.metadata());
    }
}
