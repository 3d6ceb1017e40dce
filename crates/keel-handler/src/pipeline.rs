//! Fixed-order execution pipeline.
//!
//! Every run walks the same stages in the same order. A stage that was not
//! configured on the descriptor is skipped.
//!
//! 1. **Request mutation** - Merge the mutator's patch into the context
//! 2. **Middleware** - Run the composite middleware
//! 3. **Evaluation** - Run the evaluator against the state bag
//! 4. **Validation** - Validate body, then params, then headers
//! 5. **Before-hooks** - Run hooks in declaration order
//! 6. **Handler** - Resolve the version and run the chosen handler
//!
//! The first failing stage aborts the run. Its error is logged with the
//! descriptor's kind and identifier and returned to the caller unchanged.

use crate::descriptor::Descriptor;
use crate::version::VersionResolver;
use keel_core::{
    read_json_body, FieldGroup, InitialContext, KeelError, KeelResult, RequestContext,
    SharedRequest,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Pipeline stage marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: request mutation
    Mutation = 1,
    /// Stage 2: composite middleware
    Middleware = 2,
    /// Stage 3: state evaluation
    Evaluation = 3,
    /// Stage 4: schema validation
    Validation = 4,
    /// Stage 5: before-hooks
    BeforeHooks = 5,
    /// Stage 6: version resolution and handler invocation
    Handler = 6,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Middleware => "middleware",
            Self::Evaluation => "evaluation",
            Self::Validation => "validation",
            Self::BeforeHooks => "before_hooks",
            Self::Handler => "handler",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 6] {
        [
            Self::Mutation,
            Self::Middleware,
            Self::Evaluation,
            Self::Validation,
            Self::BeforeHooks,
            Self::Handler,
        ]
    }
}

/// Runs descriptors against requests.
///
/// The pipeline holds no per-request state, so one instance can serve any
/// number of concurrent runs.
#[derive(Debug, Clone)]
pub struct ExecutionPipeline {
    resolver: VersionResolver,
    validation_enabled: bool,
}

impl Default for ExecutionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionPipeline {
    /// Creates a pipeline with the default version resolver and validation on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: VersionResolver::default(),
            validation_enabled: true,
        }
    }

    /// Uses a custom version resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: VersionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Turns the validation stage on or off for every descriptor.
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    /// The version resolver.
    #[must_use]
    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Whether the validation stage runs.
    #[must_use]
    pub fn validation_enabled(&self) -> bool {
        self.validation_enabled
    }

    /// Runs every configured stage for one request.
    ///
    /// Returns the populated context on success. On failure the context is
    /// dropped and the failing stage's error is returned.
    pub async fn execute(
        &self,
        descriptor: &Descriptor,
        request: SharedRequest,
        initial: InitialContext,
    ) -> KeelResult<RequestContext> {
        let mut ctx = RequestContext::new(request, initial);

        match self.run_stages(descriptor, &mut ctx).await {
            Ok(()) => {
                debug!(
                    kind = %descriptor.kind(),
                    identifier = descriptor.identifier(),
                    request_id = %ctx.request_id(),
                    duration_ms = ctx.elapsed().as_millis() as u64,
                    "execution completed"
                );
                Ok(ctx)
            }
            Err((stage, err)) => {
                error!(
                    kind = %descriptor.kind(),
                    identifier = descriptor.identifier(),
                    stage = stage.name(),
                    request_id = %ctx.request_id(),
                    error = %err,
                    "execution failed"
                );
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        descriptor: &Descriptor,
        ctx: &mut RequestContext,
    ) -> Result<(), (Stage, KeelError)> {
        if let Some(mutator) = descriptor.request_mutator() {
            enter(Stage::Mutation, ctx);
            let request = Arc::clone(ctx.request());
            let patch = mutator(request.as_ref())
                .await
                .map_err(|e| (Stage::Mutation, e))?;
            ctx.apply_patch(patch);
        }

        if let Some(middleware) = descriptor.middleware() {
            enter(Stage::Middleware, ctx);
            middleware
                .process(ctx)
                .await
                .map_err(|e| (Stage::Middleware, e))?;
        }

        if let Some(evaluator) = descriptor.evaluator() {
            enter(Stage::Evaluation, ctx);
            evaluator(ctx.state_mut())
                .await
                .map_err(|e| (Stage::Evaluation, e))?;
        }

        if self.validation_enabled {
            enter(Stage::Validation, ctx);
            validate(descriptor, ctx)
                .await
                .map_err(|e| (Stage::Validation, e))?;
        }

        if !descriptor.before_hooks().is_empty() {
            enter(Stage::BeforeHooks, ctx);
            for hook in descriptor.before_hooks() {
                hook(&mut *ctx).await.map_err(|e| (Stage::BeforeHooks, e))?;
            }
        }

        enter(Stage::Handler, ctx);
        let resolution = self
            .resolver
            .resolve(descriptor, ctx)
            .map_err(|e| (Stage::Handler, e))?;
        debug!(
            request_id = %ctx.request_id(),
            version = resolution.selected.version().unwrap_or("base"),
            "handler resolved"
        );
        (resolution.handler)(ctx)
            .await
            .map_err(|e| (Stage::Handler, e))
    }
}

fn enter(stage: Stage, ctx: &RequestContext) {
    debug!(stage = stage.name(), request_id = %ctx.request_id(), "entering stage");
}

async fn validate(descriptor: &Descriptor, ctx: &mut RequestContext) -> KeelResult<()> {
    if let Some(schema) = descriptor.validator(FieldGroup::Body) {
        let raw = match ctx.body() {
            Some(body) => body.clone(),
            None => read_json_body(ctx.request().as_ref()).await?,
        };
        let data = schema
            .validate(&raw)
            .map_err(|issues| KeelError::validation(FieldGroup::Body, issues))?;
        ctx.set_body(data);
        ctx.mark_validated(FieldGroup::Body);
    }

    if let Some(schema) = descriptor.validator(FieldGroup::Params) {
        let raw = Value::Object(ctx.params().clone());
        let data = schema
            .validate(&raw)
            .map_err(|issues| KeelError::validation(FieldGroup::Params, issues))?;
        if let Value::Object(params) = data {
            ctx.set_params(params);
        }
        ctx.mark_validated(FieldGroup::Params);
    }

    if let Some(schema) = descriptor.validator(FieldGroup::Headers) {
        let raw = Value::Object(ctx.header_object());
        let data = schema
            .validate(&raw)
            .map_err(|issues| KeelError::validation(FieldGroup::Headers, issues))?;
        if let Value::Object(headers) = data {
            ctx.set_headers(headers);
        }
        ctx.mark_validated(FieldGroup::Headers);
    }

    Ok(())
}
