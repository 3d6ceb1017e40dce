//! Operation objects derived from route descriptors.

use crate::openapi::{MediaType, Operation, Parameter, ParameterIn, RequestBody, Response};
use indexmap::IndexMap;
use keel_core::{FieldGroup, HandlerKind};
use keel_handler::Descriptor;
use serde_json::Value;

/// Builds the OpenAPI operation for a route descriptor.
///
/// Returns `None` for events, crons and tasks.
///
/// Each params-schema property becomes a `path` parameter, required when
/// listed in the schema's `required`. Path segments the params schema does
/// not describe are still emitted as required string parameters.
#[must_use]
pub fn to_operation(descriptor: &Descriptor) -> Option<Operation> {
    if descriptor.kind() != HandlerKind::Route {
        return None;
    }

    let path_params: Vec<&str> = descriptor
        .route()
        .map(|route| route.param_names())
        .unwrap_or_default();

    let mut parameters = Vec::new();
    if let Some(params) = descriptor.validator(FieldGroup::Params) {
        parameters.extend(
            properties(params.schema())
                .into_iter()
                .map(|(name, schema, required)| Parameter {
                    name,
                    location: ParameterIn::Path,
                    required,
                    schema: Some(schema),
                }),
        );
    }
    for name in &path_params {
        if !parameters.iter().any(|p| p.name == *name) {
            parameters.push(Parameter {
                name: (*name).to_string(),
                location: ParameterIn::Path,
                required: true,
                schema: Some(serde_json::json!({ "type": "string" })),
            });
        }
    }
    if let Some(headers) = descriptor.validator(FieldGroup::Headers) {
        parameters.extend(
            properties(headers.schema())
                .into_iter()
                .map(|(name, schema, required)| Parameter {
                    name,
                    location: ParameterIn::Header,
                    required,
                    schema: Some(schema),
                }),
        );
    }

    let request_body = descriptor
        .validator(FieldGroup::Body)
        .map(|body| RequestBody {
            required: true,
            content: MediaType::json(body.schema().clone()),
        });

    let mut responses = IndexMap::new();
    for decl in descriptor.responses() {
        responses.insert(
            decl.status.to_string(),
            Response {
                description: format!("Response {}", decl.status),
                content: MediaType::json(decl.schema.clone()),
            },
        );
    }

    Some(Operation {
        operation_id: descriptor.label().map(str::to_owned),
        summary: descriptor
            .description()
            .map_or_else(|| format!("{} {}", descriptor.kind(), descriptor.identifier()), str::to_owned),
        tags: descriptor.tags().to_vec(),
        parameters,
        request_body,
        responses,
    })
}

/// `(name, schema, required)` for each declared property of an object schema.
fn properties(schema: &Value) -> Vec<(String, Value, bool)> {
    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    props
        .iter()
        .map(|(name, prop)| (name.clone(), prop.clone(), required.contains(&name.as_str())))
        .collect()
}
