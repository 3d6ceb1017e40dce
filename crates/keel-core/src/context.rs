//! Request context types.
//!
//! A [`RequestContext`] is created fresh for every pipeline run and owned by
//! that run alone. Each stage fills in more of it: the mutator patches it,
//! the evaluator edits the state bag, validation replaces raw params, body
//! and headers with their validated form, and handlers record outcome
//! fields.

use crate::transport::{header_object, SharedRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Mutable per-request state operated on by evaluators.
pub type StateBag = Map<String, Value>;

/// A unique identifier for each pipeline run, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three validated parts of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGroup {
    /// JSON request body.
    Body,
    /// Path and query parameters.
    Params,
    /// Request headers.
    Headers,
}

impl FieldGroup {
    /// Returns the lowercase group name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Params => "params",
            Self::Headers => "headers",
        }
    }

    /// Returns the groups in validation order.
    #[must_use]
    pub const fn all() -> [FieldGroup; 3] {
        [Self::Body, Self::Params, Self::Headers]
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied starting values for a run.
///
/// Transports put routing params here; event and task dispatchers put the
/// payload in `body`.
#[derive(Debug, Clone, Default)]
pub struct InitialContext {
    /// Path and query parameters.
    pub params: Map<String, Value>,
    /// Initial state bag.
    pub state: StateBag,
    /// Pre-parsed body, used instead of reading the transport body.
    pub body: Option<Value>,
}

impl InitialContext {
    /// Creates an empty initial context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a state entry.
    #[must_use]
    pub fn state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Changes produced by a request mutator.
///
/// Maps are merged key by key into the context; `body` replaces.
#[derive(Debug, Clone, Default)]
pub struct ContextPatch {
    /// Parameters to merge.
    pub params: Map<String, Value>,
    /// Headers to merge, keyed by lowercase name.
    pub headers: Map<String, Value>,
    /// Replacement body.
    pub body: Option<Value>,
    /// State entries to merge.
    pub state: StateBag,
    /// Outcome fields to merge.
    pub fields: Map<String, Value>,
}

impl ContextPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets a header. The name is lowercased.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), Value::String(value.into()));
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a state entry.
    #[must_use]
    pub fn state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// Sets an outcome field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Per-run context threaded through every pipeline stage.
pub struct RequestContext {
    request_id: RequestId,
    request: SharedRequest,
    state: StateBag,
    params: Map<String, Value>,
    body: Option<Value>,
    headers: Option<Map<String, Value>>,
    validated: BTreeSet<FieldGroup>,
    fields: Map<String, Value>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a fresh context for one run.
    #[must_use]
    pub fn new(request: SharedRequest, initial: InitialContext) -> Self {
        Self {
            request_id: RequestId::new(),
            request,
            state: initial.state,
            params: initial.params,
            body: initial.body,
            headers: None,
            validated: BTreeSet::new(),
            fields: Map::new(),
            extensions: HashMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the transport request.
    #[must_use]
    pub fn request(&self) -> &SharedRequest {
        &self.request
    }

    /// Returns the state bag.
    #[must_use]
    pub fn state(&self) -> &StateBag {
        &self.state
    }

    /// Returns the state bag mutably.
    pub fn state_mut(&mut self) -> &mut StateBag {
        &mut self.state
    }

    /// Returns the parameters (validated once the params stage has run).
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Returns one parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Replaces the parameters.
    pub fn set_params(&mut self, params: Map<String, Value>) {
        self.params = params;
    }

    /// Returns the body, if one was supplied, patched in or validated.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Replaces the body.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Returns the header slot, populated by a mutator patch or validation.
    #[must_use]
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.headers.as_ref()
    }

    /// Replaces the header slot.
    pub fn set_headers(&mut self, headers: Map<String, Value>) {
        self.headers = Some(headers);
    }

    /// Returns the header slot, or the transport headers when the slot is empty.
    #[must_use]
    pub fn header_object(&self) -> Map<String, Value> {
        self.headers
            .clone()
            .unwrap_or_else(|| header_object(self.request.headers()))
    }

    /// Looks up a header as a string.
    ///
    /// The header slot wins over the raw transport headers.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = &self.headers {
            if let Some(value) = slot.get(&name) {
                return value_as_string(value);
            }
        }
        self.request
            .headers()
            .get(name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    /// Marks a field group as validated.
    pub fn mark_validated(&mut self, group: FieldGroup) {
        self.validated.insert(group);
    }

    /// Returns true if the group passed validation in this run.
    #[must_use]
    pub fn is_validated(&self, group: FieldGroup) -> bool {
        self.validated.contains(&group)
    }

    /// Returns all outcome fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns one outcome field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets an outcome field.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Merges a mutator patch into this context.
    pub fn apply_patch(&mut self, patch: ContextPatch) {
        self.params.extend(patch.params);
        if !patch.headers.is_empty() {
            self.headers
                .get_or_insert_with(|| header_object(self.request.headers()))
                .extend(patch.headers);
        }
        if let Some(body) = patch.body {
            self.body = Some(body);
        }
        self.state.extend(patch.state);
        self.fields.extend(patch.fields);
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// When this run started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since this run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("state", &self.state)
            .field("params", &self.params)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("validated", &self.validated)
            .field("fields", &self.fields)
            .field("extensions", &self.extensions.len())
            .finish_non_exhaustive()
    }
}

/// String form of a scalar JSON value; `None` for null, arrays and objects.
#[must_use]
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
