//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes valid)
//! - Check route patterns, methods and the mount prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Duplicate routes are left to the router, which owns that rule

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::schema::MockServerConfig;
use crate::routing::PathPattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MockServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.trim().is_empty() {
        errors.push(ValidationError::new("server.bind_address", "must not be empty"));
    }

    match PathPattern::parse(&config.server.mount_prefix) {
        Ok(prefix) if !prefix.is_literal() => errors.push(ValidationError::new(
            "server.mount_prefix",
            "must not contain parameters or wildcards",
        )),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("server.mount_prefix", e.to_string())),
    }

    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "limits.request_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "limits.max_body_bytes",
            "must be greater than 0",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    for (i, route) in config.routes.iter().enumerate() {
        let field = |name: &str| format!("routes[{}].{}", i, name);

        if route.http_method().is_err() {
            errors.push(ValidationError::new(
                field("method"),
                format!("`{}` is not an HTTP method", route.method),
            ));
        }
        if let Err(e) = PathPattern::parse(&route.path) {
            errors.push(ValidationError::new(field("path"), e.to_string()));
        }
        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::new(
                field("status"),
                format!("{} is not a valid status code", route.status),
            ));
        }
        for (name, value) in &route.headers {
            if HeaderName::try_from(name.as_str()).is_err()
                || HeaderValue::try_from(value.as_str()).is_err()
            {
                errors.push(ValidationError::new(
                    field("headers"),
                    format!("invalid header `{}`", name),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(method: &str, path: &str, status: u16) -> RouteConfig {
        RouteConfig {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: None,
            headers: Default::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&MockServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = MockServerConfig::default();
        config.server.mount_prefix = "api".into();
        config.limits.request_timeout_secs = 0;
        config.routes.push(route("FETCH ME", "/ok", 200));
        config.routes.push(route("GET", "no-slash", 1000));

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.mount_prefix",
                "limits.request_timeout_secs",
                "routes[0].method",
                "routes[1].path",
                "routes[1].status",
            ]
        );
    }

    #[test]
    fn parameterised_prefix_rejected() {
        let mut config = MockServerConfig::default();
        config.server.mount_prefix = "/api/:version".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "server.mount_prefix");
    }

    #[test]
    fn lowercase_method_is_canonicalised() {
        let route = route("get", "/health", 200);
        assert_eq!(route.http_method().unwrap(), Some(axum::http::Method::GET));

        let mut config = MockServerConfig::default();
        config.routes.push(route);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn wildcard_method_allowed() {
        let mut config = MockServerConfig::default();
        config.routes.push(route("*", "/legacy/*", 410));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_metrics_address_only_checked_when_enabled() {
        let mut config = MockServerConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
