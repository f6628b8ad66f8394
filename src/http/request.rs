//! Request representation handed to route handlers.
//!
//! # Responsibilities
//! - Capture method, path, query, headers and the buffered body
//! - Carry path parameters extracted by the router
//! - Decode JSON object bodies for the mock responder
//!
//! # Design Decisions
//! - Immutable once received; routing derives a scoped copy instead of mutating
//! - Body is buffered `Bytes`, so scoped copies are cheap
//! - An empty body decodes as an empty object

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};

use crate::http::error::ApiError;
use crate::routing::PathParams;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A fully buffered HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: PathParams,
}

impl ApiRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: PathParams::new(),
        }
    }

    /// Build from the parts of an incoming axum request and its buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            body,
            params: PathParams::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Copy of this request as seen by a handler mounted below a prefix.
    pub(crate) fn scoped(&self, path: String, params: PathParams) -> Self {
        Self {
            path,
            params,
            ..self.clone()
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the router that dispatched this request.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Look up a path parameter captured by the matched route.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Correlation ID assigned by the request-id middleware.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as a JSON object.
    ///
    /// Rejects non-JSON content types, unparseable bodies and JSON values that
    /// are not objects. Whitespace-only bodies decode as an empty object.
    pub fn json_object(&self) -> Result<Map<String, Value>, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        if let Some(content_type) = self.headers.get(header::CONTENT_TYPE) {
            let content_type = content_type
                .to_str()
                .map_err(|_| ApiError::BadRequest("invalid content-type header".into()))?;
            if !is_json_content_type(content_type) {
                return Err(ApiError::BadRequest(format!(
                    "unsupported content type `{}`, expected application/json",
                    content_type
                )));
            }
        }

        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ApiError::BadRequest("body must be a JSON object".into())),
            Err(e) => Err(ApiError::BadRequest(format!("malformed JSON body: {}", e))),
        }
    }
}

fn is_json_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
