//! Response construction.
//!
//! # Responsibilities
//! - Build status + headers + optional JSON body per request
//! - Convert into an axum response
//!
//! # Design Decisions
//! - Built fresh for every request, never shared
//! - A body always means `content-type: application/json`
//! - 204 responses never carry a body

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Response produced by a route handler.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// 200 with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, Some(body))
    }

    /// 201 with the created resource.
    pub fn created(body: Value) -> Self {
        Self::new(StatusCode::CREATED, Some(body))
    }

    /// 204 without a body.
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, None)
    }

    /// 200 with an empty JSON object.
    pub fn empty() -> Self {
        Self::ok(Value::Object(Default::default()))
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let body = match self.body {
            Some(value) if self.status != StatusCode::NO_CONTENT => Some(value.to_string()),
            _ => None,
        };

        let mut response = match body {
            Some(text) => {
                let mut response = Response::new(Body::from(text));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
            None => Response::new(Body::empty()),
        };

        *response.status_mut() = self.status;
        // Handler-supplied headers win over the default content type.
        for (name, value) in self.headers.iter() {
            response.headers_mut().insert(name.clone(), value.clone());
        }
        response
    }
}
