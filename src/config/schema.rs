//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mock server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use axum::http::method::InvalidMethod;
use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Root configuration for the mock server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MockServerConfig {
    /// Listener and mount point.
    pub server: ServerConfig,

    /// Mock fallback behaviour.
    pub mock: MockConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Built-in admin endpoints.
    pub admin: AdminConfig,

    /// Static routes answered instead of the mock fallback.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address without port (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port.
    pub port: u16,

    /// Path prefix everything except the admin endpoints is served under.
    pub mount_prefix: String,
}

impl ServerConfig {
    /// `bind_address:port`, bracketing IPv6 literals.
    pub fn socket_address(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            mount_prefix: "/".to_string(),
        }
    }
}

/// How record identifiers are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// 1, 2, 3, ... per collection.
    #[default]
    Sequential,
    /// Random UUID v4.
    Uuid,
}

/// Mock fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockConfig {
    /// Answer unmatched requests with synthetic responses (404 otherwise).
    pub enabled: bool,

    /// Store records written through the mock fallback.
    pub persist: bool,

    /// Identifier generation strategy.
    pub id_strategy: IdStrategy,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            persist: true,
            id_strategy: IdStrategy::Sequential,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total time allowed per request, body read included.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve `/__admin/*`.
    pub enabled: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A static route answered with a fixed response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method, or "*" for any method.
    #[serde(default = "default_method")]
    pub method: String,

    /// Path pattern, e.g. "/users/:id".
    pub path: String,

    /// Response status code.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body.
    #[serde(default)]
    pub body: Option<serde_json::Value>,

    /// Extra response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RouteConfig {
    /// The configured method in canonical upper case; `None` for "*".
    pub fn http_method(&self) -> Result<Option<Method>, InvalidMethod> {
        if self.method == "*" {
            return Ok(None);
        }
        Method::from_bytes(self.method.to_ascii_uppercase().as_bytes()).map(Some)
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}
