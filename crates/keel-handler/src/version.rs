//! Version negotiation.
//!
//! The requested version is read from a reserved header first, then from a
//! reserved parameter. An exact label match wins. Without a match the last
//! declared version is used: "latest" means declaration order, and labels are
//! never parsed or compared as version numbers. With no versions at all the
//! base handler runs.

use crate::descriptor::Descriptor;
use keel_core::{value_as_string, HandlerFn, KeelError, KeelResult, RequestContext};

/// Default header carrying the version hint.
pub const DEFAULT_VERSION_HEADER: &str = "x-api-version";

/// Default parameter carrying the version hint.
pub const DEFAULT_VERSION_PARAM: &str = "version";

/// Which handler a resolution picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected<'d> {
    /// The hint matched this version exactly.
    Requested(&'d str),
    /// No usable hint; fell back to the last declared version.
    Latest(&'d str),
    /// No versions declared; the base handler.
    Base,
}

impl Selected<'_> {
    /// The chosen version label, if a version was chosen.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Requested(label) | Self::Latest(label) => Some(*label),
            Self::Base => None,
        }
    }
}

/// The outcome of resolving a descriptor against a request.
#[derive(Clone, Copy)]
pub struct Resolution<'d> {
    /// The handler to run.
    pub handler: &'d HandlerFn,
    /// Why it was chosen.
    pub selected: Selected<'d>,
}

/// Picks the handler for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResolver {
    header: String,
    param: String,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_HEADER, DEFAULT_VERSION_PARAM)
    }
}

impl VersionResolver {
    /// Creates a resolver reading the given header and parameter.
    pub fn new(header: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
            param: param.into(),
        }
    }

    /// The hint header name.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The hint parameter name.
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Reads the version hint: header first, then parameter. Empty hints are ignored.
    #[must_use]
    pub fn requested_version(&self, ctx: &RequestContext) -> Option<String> {
        ctx.header(&self.header)
            .filter(|v| !v.is_empty())
            .or_else(|| {
                ctx.param(&self.param)
                    .and_then(value_as_string)
                    .filter(|v| !v.is_empty())
            })
    }

    /// Resolves the handler for this request.
    pub fn resolve<'d>(
        &self,
        descriptor: &'d Descriptor,
        ctx: &RequestContext,
    ) -> KeelResult<Resolution<'d>> {
        let requested = self.requested_version(ctx);
        select(descriptor, requested.as_deref()).ok_or_else(|| {
            KeelError::configuration(
                descriptor.kind(),
                descriptor.identifier(),
                "no handler available for request",
            )
        })
    }
}

/// Selects a handler given an optional hint.
#[must_use]
pub fn select<'d>(descriptor: &'d Descriptor, hint: Option<&str>) -> Option<Resolution<'d>> {
    let versions = descriptor.versions();

    if let Some(hint) = hint {
        if let Some(entry) = versions.iter().find(|v| v.label() == hint) {
            return Some(Resolution {
                handler: entry.handler(),
                selected: Selected::Requested(entry.label()),
            });
        }
    }

    if let Some(latest) = versions.last() {
        return Some(Resolution {
            handler: latest.handler(),
            selected: Selected::Latest(latest.label()),
        });
    }

    descriptor.base_handler().map(|handler| Resolution {
        handler,
        selected: Selected::Base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HandlerDescriptor;
    use keel_core::fixtures::MockRequest;
    use keel_core::{BoxFuture, InitialContext};
    use proptest::prelude::*;

    fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn versioned() -> Descriptor {
        HandlerDescriptor::route("/items")
            .version("v1", noop)
            .version("v2", noop)
            .finalize()
            .unwrap()
    }

    fn ctx(request: MockRequest, initial: InitialContext) -> RequestContext {
        RequestContext::new(request.into_shared(), initial)
    }

    #[test]
    fn test_header_hint_selects_exact_version() {
        let d = versioned();
        let c = ctx(MockRequest::new().header("x-api-version", "v1"), InitialContext::new());
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected, Selected::Requested("v1"));
    }

    #[test]
    fn test_no_hint_selects_latest() {
        let d = versioned();
        let c = ctx(MockRequest::new(), InitialContext::new());
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected, Selected::Latest("v2"));
    }

    #[test]
    fn test_unknown_hint_selects_latest() {
        let d = versioned();
        let c = ctx(MockRequest::new().header("x-api-version", "v3"), InitialContext::new());
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected, Selected::Latest("v2"));
    }

    #[test]
    fn test_param_hint_used_when_header_absent() {
        let d = versioned();
        let c = ctx(MockRequest::new(), InitialContext::new().param("version", "v1"));
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected.version(), Some("v1"));
    }

    #[test]
    fn test_header_beats_param() {
        let d = versioned();
        let c = ctx(
            MockRequest::new().header("x-api-version", "v2"),
            InitialContext::new().param("version", "v1"),
        );
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected, Selected::Requested("v2"));
    }

    #[test]
    fn test_custom_names() {
        let d = versioned();
        let resolver = VersionResolver::new("Accept-Version", "v");
        assert_eq!(resolver.header(), "accept-version");
        let c = ctx(MockRequest::new().header("accept-version", "v1"), InitialContext::new());
        assert_eq!(
            resolver.resolve(&d, &c).unwrap().selected,
            Selected::Requested("v1")
        );
    }

    #[test]
    fn test_base_handler_without_versions() {
        let d = HandlerDescriptor::task("t").handler(noop).finalize().unwrap();
        let c = ctx(MockRequest::new().header("x-api-version", "v1"), InitialContext::new());
        let r = VersionResolver::default().resolve(&d, &c).unwrap();
        assert_eq!(r.selected, Selected::Base);
        assert!(std::sync::Arc::ptr_eq(r.handler, d.base_handler().unwrap()));
    }

    proptest! {
        #[test]
        fn prop_no_hint_resolves_to_last_declared(
            labels in proptest::collection::vec("[a-z0-9.]{1,6}", 1..8)
        ) {
            let mut builder = HandlerDescriptor::event("e");
            for label in &labels {
                builder = builder.version(label.clone(), noop);
            }
            let d = builder.finalize().unwrap();
            let r = select(&d, None).unwrap();
            prop_assert_eq!(r.selected, Selected::Latest(labels.last().unwrap().as_str()));
            prop_assert!(std::sync::Arc::ptr_eq(r.handler, d.versions().last().unwrap().handler()));
        }

        #[test]
        fn prop_unmatched_hint_uses_base_handler_when_no_versions(hint in "[a-z0-9]{0,6}") {
            let d = HandlerDescriptor::event("e").handler(noop).finalize().unwrap();
            let r = select(&d, Some(&hint)).unwrap();
            prop_assert_eq!(r.selected, Selected::Base);
        }

        #[test]
        fn prop_matching_hint_selects_first_exact_label(
            labels in proptest::collection::vec("v[0-9]", 1..6),
            pick in any::<prop::sample::Index>()
        ) {
            let mut builder = HandlerDescriptor::route("/p");
            for label in &labels {
                builder = builder.version(label.clone(), noop);
            }
            let d = builder.finalize().unwrap();
            let wanted = &labels[pick.index(labels.len())];
            let r = select(&d, Some(wanted)).unwrap();
            prop_assert_eq!(r.selected, Selected::Requested(wanted.as_str()));
        }
    }
}
