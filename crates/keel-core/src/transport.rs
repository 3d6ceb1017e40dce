//! The request side of the transport contract.
//!
//! Keel never owns a server. A transport hands the pipeline something that
//! implements [`TransportRequest`]: queryable headers plus an asynchronous
//! full-body read.

use crate::error::KeelResult;
use crate::handler::BoxFuture;
use bytes::Bytes;
use http::HeaderMap;
use http_body_util::{BodyExt, Full};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// A request as seen by the pipeline.
pub trait TransportRequest: Send + Sync {
    /// Request headers.
    fn headers(&self) -> &HeaderMap;

    /// Reads the full request body.
    fn read_body(&self) -> BoxFuture<'_, KeelResult<Bytes>>;
}

/// Shared handle to a transport request.
pub type SharedRequest = Arc<dyn TransportRequest>;

impl TransportRequest for http::Request<Full<Bytes>> {
    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }

    fn read_body(&self) -> BoxFuture<'_, KeelResult<Bytes>> {
        let body = self.body().clone();
        Box::pin(async move {
            body.collect()
                .await
                .map(http_body_util::Collected::to_bytes)
                .map_err(|never| match never {})
        })
    }
}

/// Converts a header map into a JSON object keyed by lowercase header name.
///
/// Repeated headers are joined with `", "`. Values that are not visible
/// ASCII are skipped.
#[must_use]
pub fn header_object(headers: &HeaderMap) -> Map<String, Value> {
    let mut out: Map<String, Value> = Map::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        match out.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            _ => {
                out.insert(name.as_str().to_string(), Value::String(value.to_string()));
            }
        }
    }
    out
}

/// Reads the body and parses it as JSON.
///
/// An empty or unparsable body yields an empty object.
pub async fn read_json_body(request: &dyn TransportRequest) -> KeelResult<Value> {
    let bytes = request.read_body().await?;
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            debug!(error = %e, "request body is not JSON, treating as empty object");
            Ok(Value::Object(Map::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: &'static str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .header("X-Api-Version", "v1")
            .header("accept", "text/html")
            .header("accept", "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[test]
    fn test_header_object_lowercases_and_joins() {
        let req = request("");
        let map = header_object(TransportRequest::headers(&req));
        assert_eq!(map["x-api-version"], "v1");
        assert_eq!(map["accept"], "text/html, application/json");
    }

    #[tokio::test]
    async fn test_read_json_body() {
        let req = request(r#"{"a":1}"#);
        assert_eq!(read_json_body(&req).await.unwrap(), json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_empty_or_invalid_body_is_empty_object() {
        assert_eq!(read_json_body(&request("")).await.unwrap(), json!({}));
        assert_eq!(read_json_body(&request("not json")).await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_body_can_be_read_twice() {
        let req = request("[1]");
        assert_eq!(req.read_body().await.unwrap(), Bytes::from_static(b"[1]"));
        assert_eq!(req.read_body().await.unwrap(), Bytes::from_static(b"[1]"));
    }
}
