//! Mock responder: synthesizes REST-style responses for unmatched requests.
//!
//! # Responsibilities
//! - Recognise `{method} /{collection}[/{id}]` request shapes
//! - Serve CRUD semantics from the MockStore
//! - Answer every other shape permissively with `{}`
//!
//! # Design Decisions
//! - Never blocks exploratory use: unknown shapes get 200, not an error
//! - Body errors (400) are detected before anything is written
//! - With persistence off, writes are acknowledged but not stored

use std::sync::Arc;

use axum::http::Method;
use serde_json::Value;

use crate::http::{ApiError, ApiRequest, ApiResponse};
use crate::mock::store::MockStore;
use crate::routing::matcher::split_path;
use crate::routing::RequestHandler;

/// Resource shape of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape<'a> {
    Collection(&'a str),
    Item(&'a str, &'a str),
    Other,
}

impl<'a> Shape<'a> {
    fn of(path: &'a str) -> Self {
        let mut segments = split_path(path);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(collection), None, None) => Shape::Collection(collection),
            (Some(collection), Some(id), None) => Shape::Item(collection, id),
            _ => Shape::Other,
        }
    }
}

/// Fallback handler backed by a [`MockStore`].
pub struct MockResponder {
    store: Arc<MockStore>,
    persist: bool,
}

impl MockResponder {
    pub fn new(store: Arc<MockStore>, persist: bool) -> Self {
        Self { store, persist }
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    fn create(&self, collection: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let fields = request.json_object()?;

        let record = if self.persist {
            self.store.create(collection, fields)
        } else {
            let mut fields = fields;
            let id = self.store.reserve_id(collection);
            fields.insert("id".to_string(), id.to_value());
            Value::Object(fields)
        };
        Ok(ApiResponse::created(record))
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        request: &ApiRequest,
        merge: bool,
    ) -> Result<ApiResponse, ApiError> {
        let fields = request.json_object()?;

        if !self.persist {
            let mut fields = fields;
            fields.insert("id".to_string(), echo_id(id));
            return Ok(ApiResponse::ok(Value::Object(fields)));
        }

        let updated = if merge {
            self.store.merge(collection, id, fields)
        } else {
            self.store.replace(collection, id, fields)
        };
        updated
            .map(ApiResponse::ok)
            .ok_or_else(|| not_found(collection, id))
    }

    fn delete(&self, collection: &str, id: &str) -> Result<ApiResponse, ApiError> {
        if !self.persist || self.store.delete(collection, id) {
            Ok(ApiResponse::no_content())
        } else {
            Err(not_found(collection, id))
        }
    }
}

impl RequestHandler for MockResponder {
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let shape = Shape::of(request.path());
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            shape = ?shape,
            "Mock fallback"
        );

        match (request.method(), shape) {
            (&Method::GET, Shape::Collection(collection)) => {
                Ok(ApiResponse::ok(Value::Array(self.store.list(collection))))
            }
            (&Method::POST, Shape::Collection(collection)) => self.create(collection, request),
            (&Method::GET, Shape::Item(collection, id)) => self
                .store
                .get(collection, id)
                .map(ApiResponse::ok)
                .ok_or_else(|| not_found(collection, id)),
            (&Method::PUT, Shape::Item(collection, id)) => {
                self.update(collection, id, request, false)
            }
            (&Method::PATCH, Shape::Item(collection, id)) => {
                self.update(collection, id, request, true)
            }
            (&Method::DELETE, Shape::Item(collection, id)) => self.delete(collection, id),
            _ => Ok(ApiResponse::empty()),
        }
    }
}

fn not_found(collection: &str, id: &str) -> ApiError {
    ApiError::NotFound(format!("no record `{}` in collection `{}`", id, collection))
}

/// Path id as JSON: canonical decimal ids stay numbers.
fn echo_id(id: &str) -> Value {
    match id.parse::<u64>() {
        Ok(n) if n.to_string() == id => Value::from(n),
        _ => Value::String(id.to_string()),
    }
}
