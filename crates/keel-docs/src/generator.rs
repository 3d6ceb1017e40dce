//! Whole-document OpenAPI generation.

use crate::emitter::to_operation;
use crate::error::{DocsError, DocsResult};
use crate::openapi::{Info, OpenApi, PathItem, Server, Tag};
use indexmap::IndexMap;
use keel_handler::Descriptor;
use std::collections::BTreeSet;
use tracing::debug;

/// OpenAPI version emitted by [`OpenApiGenerator`].
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Builds an OpenAPI document from route descriptors.
///
/// ```
/// use keel_core::{BoxFuture, KeelResult, RequestContext};
/// use keel_docs::OpenApiGenerator;
/// use keel_handler::HandlerDescriptor;
///
/// fn noop(_ctx: &mut RequestContext) -> BoxFuture<'_, KeelResult<()>> {
///     Box::pin(async { Ok(()) })
/// }
///
/// let users = HandlerDescriptor::route("GET /users").handler(noop).finalize().unwrap();
/// let doc = OpenApiGenerator::new()
///     .title("Users")
///     .version("1.0.0")
///     .generate([&users])
///     .unwrap();
/// assert!(doc.paths["/users"].get.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenApiGenerator {
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    servers: Vec<Server>,
}

impl OpenApiGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a server.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>, description: Option<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description,
        });
        self
    }

    /// Generate a document. Non-route descriptors are skipped.
    ///
    /// Operations are grouped by path template, then method. Two routes
    /// landing on the same slot fail with [`DocsError::DuplicateOperation`].
    pub fn generate<'a, I>(&self, descriptors: I) -> DocsResult<OpenApi>
    where
        I: IntoIterator<Item = &'a Descriptor>,
    {
        let info = Info {
            title: self.title.clone().ok_or_else(|| DocsError::MissingField {
                field: "info.title".to_string(),
            })?,
            version: self.version.clone().ok_or_else(|| DocsError::MissingField {
                field: "info.version".to_string(),
            })?,
            description: self.description.clone(),
        };

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        let mut tags = BTreeSet::new();

        for descriptor in descriptors {
            let (Some(route), Some(operation)) = (descriptor.route(), to_operation(descriptor))
            else {
                continue;
            };
            let path = route.openapi_path();
            let method = route.method();

            let item = paths.entry(path.clone()).or_default();
            let Some(slot) = item.slot_mut(method) else {
                return Err(DocsError::UnsupportedMethod {
                    method: method.to_string(),
                    path,
                });
            };
            if slot.is_some() {
                return Err(DocsError::DuplicateOperation {
                    method: method.to_string(),
                    path,
                });
            }

            tags.extend(operation.tags.iter().cloned());
            debug!(method = %method, path = %path, "Added OpenAPI operation");
            *slot = Some(operation);
        }

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            servers: self.servers.clone(),
            paths,
            tags: tags.into_iter().map(|name| Tag { name }).collect(),
        })
    }

    /// Generate the document as pretty-printed JSON.
    pub fn generate_json<'a, I>(&self, descriptors: I) -> DocsResult<String>
    where
        I: IntoIterator<Item = &'a Descriptor>,
    {
        let doc = self.generate(descriptors)?;
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}
