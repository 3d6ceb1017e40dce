//! Wires configuration into the pipeline and binds descriptors to a
//! transport.

use crate::registry::Registry;
use crate::transport::{ExecutableHandler, Transport};
use keel_config::KeelConfig;
use keel_core::{BoxFuture, InitialContext, KeelError, KeelResult, RequestContext, SharedRequest};
use keel_docs::OpenApiGenerator;
use keel_handler::{Descriptor, ExecutionPipeline, VersionResolver};
use std::sync::Arc;
use tracing::info;

/// Runs descriptors with a configured pipeline.
#[derive(Debug, Clone)]
pub struct Engine {
    pipeline: Arc<ExecutionPipeline>,
    generator: OpenApiGenerator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&KeelConfig::default())
    }
}

impl Engine {
    /// Builds the pipeline and documentation generator from configuration.
    #[must_use]
    pub fn new(config: &KeelConfig) -> Self {
        let pipeline = ExecutionPipeline::new()
            .with_resolver(VersionResolver::new(
                &config.versioning.header,
                &config.versioning.param,
            ))
            .with_validation(config.validation.enabled);

        let mut generator = OpenApiGenerator::new()
            .title(&config.docs.title)
            .version(&config.docs.version);
        if let Some(description) = &config.docs.description {
            generator = generator.description(description);
        }
        for server in &config.docs.servers {
            generator = generator.server(&server.url, server.description.clone());
        }

        Self::with_pipeline(pipeline, generator)
    }

    /// Uses an explicitly built pipeline and generator.
    #[must_use]
    pub fn with_pipeline(pipeline: ExecutionPipeline, generator: OpenApiGenerator) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            generator,
        }
    }

    /// The pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ExecutionPipeline {
        &self.pipeline
    }

    /// The documentation generator.
    #[must_use]
    pub fn generator(&self) -> &OpenApiGenerator {
        &self.generator
    }

    /// An executable that runs `descriptor` through this engine's pipeline.
    #[must_use]
    pub fn executable(&self, descriptor: &Descriptor) -> ExecutableHandler {
        let pipeline = Arc::clone(&self.pipeline);
        let descriptor = descriptor.clone();
        Arc::new(
            move |request: SharedRequest,
                  initial: InitialContext|
                  -> BoxFuture<'static, KeelResult<RequestContext>> {
                let pipeline = Arc::clone(&pipeline);
                let descriptor = descriptor.clone();
                Box::pin(async move { pipeline.execute(&descriptor, request, initial).await })
            },
        )
    }

    /// Registers every route in `registry` with `transport`.
    ///
    /// Returns the number of routes bound.
    pub fn bind<T: Transport + ?Sized>(&self, registry: &Registry, transport: &mut T) -> usize {
        let mut bound = 0;
        for descriptor in registry.routes() {
            let Some(route) = descriptor.route() else {
                continue;
            };
            let path = route.openapi_path();
            info!(
                method = %route.method(),
                path = %path,
                identifier = descriptor.identifier(),
                label = descriptor.label(),
                "route registered"
            );
            transport.register(route.method().clone(), path, self.executable(descriptor));
            bound += 1;
        }
        bound
    }

    /// Runs the descriptor found under `key` (label first, then identifier).
    pub async fn dispatch(
        &self,
        registry: &Registry,
        key: &str,
        request: SharedRequest,
        initial: InitialContext,
    ) -> KeelResult<RequestContext> {
        let descriptor = registry
            .find(key)
            .ok_or_else(|| KeelError::not_found(format!("no handler declared for \"{key}\"")))?;
        self.pipeline.execute(descriptor, request, initial).await
    }
}
