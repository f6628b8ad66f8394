//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store explicit routes and mounted sub-routers in registration order
//! - Resolve a request to the most specific handler plus path parameters
//! - Delegate to the fallback handler, or report NotFound
//!
//! # Design Decisions
//! - Built at startup, shared immutably behind `Arc` afterwards
//! - Most specific match wins; ties go to the first registered entry
//! - Explicit NoMatch (`None`) rather than a silent default

use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::http::{ApiError, ApiRequest, ApiResponse};
use crate::routing::matcher::{join_path, split_path, PathPattern};
use crate::routing::PathParams;

/// Registration-time routing errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A route with the same method and pattern shape already exists.
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: String, pattern: String },

    /// The pattern could not be parsed.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Anything that can answer a request.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Adapter turning a closure into a [`RequestHandler`].
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a handler.
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync,
{
    HandlerFn { f }
}

impl<F> RequestHandler for HandlerFn<F>
where
    F: Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync,
{
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        (self.f)(request)
    }
}

/// What to do when a registration repeats an existing (method, pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail with [`RouteError::DuplicateRoute`].
    #[default]
    Reject,
    /// Replace the existing handler; the route keeps its original position.
    Overwrite,
}

/// A registered route.
struct Route {
    /// `None` matches every method.
    method: Option<Method>,
    pattern: PathPattern,
    handler: Arc<dyn RequestHandler>,
}

enum Entry {
    Route(Route),
    Mount { prefix: PathPattern, router: Router },
}

/// Result of a successful lookup.
pub struct RouteMatch {
    pub handler: Arc<dyn RequestHandler>,
    pub params: PathParams,
    /// Path relative to the router (or mount) that owns the handler.
    pub path: String,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("params", &self.params)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

struct Candidate {
    matched: RouteMatch,
    specificity: Vec<u8>,
    exact_method: bool,
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        (&self.specificity, self.exact_method) > (&other.specificity, other.exact_method)
    }
}

/// Method + path router with mounting and an optional fallback.
#[derive(Default)]
pub struct Router {
    entries: Vec<Entry>,
    fallback: Option<Arc<dyn RequestHandler>>,
    policy: ConflictPolicy,
}

impl Router {
    /// Create an empty router that rejects duplicate routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty router with the given conflict policy.
    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Handler used when no route or mount resolves.
    pub fn with_fallback(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn set_fallback(&mut self, handler: Arc<dyn RequestHandler>) {
        self.fallback = Some(handler);
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Register a route for one method.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl RequestHandler + 'static,
    ) -> Result<(), RouteError> {
        self.insert(Some(method), pattern, Arc::new(handler))
    }

    /// Register a route matching every method.
    pub fn register_any(
        &mut self,
        pattern: &str,
        handler: impl RequestHandler + 'static,
    ) -> Result<(), RouteError> {
        self.insert(None, pattern, Arc::new(handler))
    }

    /// Register an already shared handler. `None` matches every method.
    pub fn register_shared(
        &mut self,
        method: Option<Method>,
        pattern: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(), RouteError> {
        self.insert(method, pattern, handler)
    }

    fn insert(
        &mut self,
        method: Option<Method>,
        pattern: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(), RouteError> {
        let pattern = PathPattern::parse(pattern)?;

        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Route(route) if route.method == method && route.pattern.same_shape(&pattern) => {
                Some(route)
            }
            _ => None,
        });

        if let Some(route) = existing {
            return match self.policy {
                ConflictPolicy::Reject => Err(RouteError::DuplicateRoute {
                    method: method_label(method.as_ref()),
                    pattern: pattern.as_str().to_string(),
                }),
                ConflictPolicy::Overwrite => {
                    tracing::debug!(
                        method = %method_label(method.as_ref()),
                        pattern = %pattern,
                        "Overwriting route"
                    );
                    route.handler = handler;
                    Ok(())
                }
            };
        }

        tracing::debug!(
            method = %method_label(method.as_ref()),
            pattern = %pattern,
            "Route registered"
        );
        self.entries.push(Entry::Route(Route {
            method,
            pattern,
            handler,
        }));
        Ok(())
    }

    /// Mount a sub-router below a literal prefix.
    ///
    /// The sub-router sees paths with the prefix stripped.
    pub fn mount(&mut self, prefix: &str, router: Router) -> Result<(), RouteError> {
        let prefix = PathPattern::parse(prefix)?;
        if !prefix.is_literal() {
            return Err(RouteError::InvalidPattern {
                pattern: prefix.as_str().to_string(),
                reason: "mount prefix must be literal".to_string(),
            });
        }

        tracing::debug!(prefix = %prefix, "Router mounted");
        self.entries.push(Entry::Mount { prefix, router });
        Ok(())
    }

    /// Find the most specific handler for a method and path.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let segments: Vec<&str> = split_path(path).collect();
        self.best_match(method, &segments).map(|c| c.matched)
    }

    fn best_match(&self, method: &Method, segments: &[&str]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for entry in &self.entries {
            let candidate = match entry {
                Entry::Route(route) => route_candidate(route, method, segments),
                Entry::Mount { prefix, router } => {
                    mount_candidate(prefix, router, method, segments)
                }
            };

            if let Some(candidate) = candidate {
                // Strictly better only: earlier registrations win ties.
                if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

fn route_candidate(route: &Route, method: &Method, segments: &[&str]) -> Option<Candidate> {
    let exact_method = match &route.method {
        Some(m) if m == method => true,
        Some(_) => return None,
        None => false,
    };

    let params = route.pattern.matches(segments)?;
    Some(Candidate {
        matched: RouteMatch {
            handler: Arc::clone(&route.handler),
            params,
            path: join_path(segments),
        },
        specificity: route.pattern.specificity(),
        exact_method,
    })
}

fn mount_candidate(
    prefix: &PathPattern,
    router: &Router,
    method: &Method,
    segments: &[&str],
) -> Option<Candidate> {
    let consumed = prefix.match_prefix(segments)?;
    let rest = &segments[consumed..];

    if let Some(inner) = router.best_match(method, rest) {
        return Some(Candidate {
            specificity: prefix.prefix_specificity(&inner.specificity),
            ..inner
        });
    }

    let fallback = router.fallback.as_ref()?;
    Some(Candidate {
        matched: RouteMatch {
            handler: Arc::clone(fallback),
            params: PathParams::new(),
            path: join_path(rest),
        },
        specificity: prefix.prefix_specificity(&PathPattern::fallback_specificity()),
        exact_method: false,
    })
}

fn method_label(method: Option<&Method>) -> String {
    method.map_or_else(|| "*".to_string(), Method::to_string)
}

impl RequestHandler for Router {
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(matched) = self.resolve(request.method(), request.path()) {
            return matched
                .handler
                .handle(&request.scoped(matched.path, matched.params));
        }

        match &self.fallback {
            Some(fallback) => fallback.handle(request),
            None => Err(ApiError::NotFound(format!(
                "no route for {} {}",
                request.method(),
                request.path()
            ))),
        }
    }
}
