//! Explicit routes answered with a fixed response from configuration.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::Value;

use crate::config::RouteConfig;
use crate::http::{ApiError, ApiRequest, ApiResponse};
use crate::routing::{RequestHandler, RouteError, Router};

/// Handler returning the same status, headers and body on every call.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    response: ApiResponse,
}

impl StaticResponse {
    pub fn new(response: ApiResponse) -> Self {
        Self { response }
    }

    /// Build from a `[[routes]]` entry. The entry is assumed validated.
    pub fn from_config(route: &RouteConfig) -> Self {
        let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
        let body = route.body.clone().or_else(|| {
            // Bodyless 2xx routes still answer with JSON, like the mock fallback.
            (status.is_success() && status != StatusCode::NO_CONTENT)
                .then(|| Value::Object(Default::default()))
        });

        let mut response = ApiResponse::new(status, body);
        for (name, value) in &route.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response = response.with_header(name, value);
            }
        }
        Self { response }
    }
}

impl RequestHandler for StaticResponse {
    fn handle(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        Ok(self.response.clone())
    }
}

/// Register every configured static route on `router`.
pub fn register_routes(router: &mut Router, routes: &[RouteConfig]) -> Result<(), RouteError> {
    for route in routes {
        let handler = StaticResponse::from_config(route);
        let method = route.http_method().map_err(|_| RouteError::InvalidPattern {
            pattern: route.path.clone(),
            reason: format!("`{}` is not an HTTP method", route.method),
        })?;
        match method {
            Some(method) => router.register(method, &route.path, handler)?,
            None => router.register_any(&route.path, handler)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde_json::json;

    fn route(method: &str, path: &str, status: u16, body: Option<Value>) -> RouteConfig {
        RouteConfig {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body,
            headers: [("x-mock".to_string(), "static".to_string())].into_iter().collect(),
        }
    }

    #[test]
    fn test_static_response_from_config() {
        let handler = StaticResponse::from_config(&route(
            "GET",
            "/health",
            200,
            Some(json!({"status": "ok"})),
        ));
        let response = handler.handle(&ApiRequest::new(Method::GET, "/health")).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), Some(&json!({"status": "ok"})));
        assert_eq!(response.headers().get("x-mock").unwrap(), "static");
    }

    #[test]
    fn test_bodyless_routes() {
        let ok = StaticResponse::from_config(&route("GET", "/a", 200, None));
        let ok = ok.handle(&ApiRequest::new(Method::GET, "/a")).unwrap();
        assert_eq!(ok.body(), Some(&json!({})));

        let gone = StaticResponse::from_config(&route("GET", "/b", 410, None));
        let gone = gone.handle(&ApiRequest::new(Method::GET, "/b")).unwrap();
        assert_eq!(gone.status(), StatusCode::GONE);
        assert!(gone.body().is_none());
    }

    #[test]
    fn test_register_routes() {
        let mut router = Router::new();
        register_routes(
            &mut router,
            &[
                route("GET", "/health", 200, None),
                route("*", "/legacy/*", 410, None),
            ],
        )
        .unwrap();

        assert!(router.resolve(&Method::GET, "/health").is_some());
        assert!(router.resolve(&Method::POST, "/health").is_none());
        assert!(router.resolve(&Method::DELETE, "/legacy/x/y").is_some());
    }

    #[test]
    fn test_lowercase_method_matches() {
        let mut router = Router::new();
        register_routes(&mut router, &[route("get", "/health", 200, None)]).unwrap();

        assert!(router.resolve(&Method::GET, "/health").is_some());
        assert!(router.resolve(&Method::POST, "/health").is_none());
    }

    #[test]
    fn test_conflicting_routes_fail() {
        let mut router = Router::new();
        let err = register_routes(
            &mut router,
            &[
                route("GET", "/users/:id", 200, None),
                route("GET", "/users/{uid}", 200, None),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    }
}
