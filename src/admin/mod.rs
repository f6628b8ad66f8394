pub mod handlers;

use std::sync::Arc;

use axum::http::Method;

use crate::config::MockConfig;
use crate::mock::MockStore;
use crate::routing::{RouteError, Router};
use self::handlers::*;

/// Path prefix of the admin endpoints.
pub const ADMIN_PREFIX: &str = "/__admin";

/// Register the admin endpoints on the root router.
pub fn register_admin_routes(
    router: &mut Router,
    store: Arc<MockStore>,
    mock: &MockConfig,
) -> Result<(), RouteError> {
    router.register(
        Method::GET,
        &format!("{}/status", ADMIN_PREFIX),
        StatusHandler {
            mock_enabled: mock.enabled,
            persist: mock.persist,
        },
    )?;
    router.register(
        Method::GET,
        &format!("{}/collections", ADMIN_PREFIX),
        CollectionsHandler {
            store: Arc::clone(&store),
        },
    )?;
    router.register(
        Method::DELETE,
        &format!("{}/collections", ADMIN_PREFIX),
        ResetHandler { store },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdStrategy;
    use crate::http::ApiRequest;
    use crate::routing::RequestHandler;
    use axum::http::StatusCode;
    use serde_json::{json, Map};

    #[test]
    fn test_admin_routes() {
        let store = Arc::new(MockStore::new(IdStrategy::Sequential));
        store.create("items", Map::new());

        let mut router = Router::new();
        register_admin_routes(&mut router, Arc::clone(&store), &MockConfig::default()).unwrap();

        let status = router
            .handle(&ApiRequest::new(Method::GET, "/__admin/status"))
            .unwrap();
        assert_eq!(status.body().unwrap()["status"], "operational");
        assert_eq!(status.body().unwrap()["persist"], true);

        let collections = router
            .handle(&ApiRequest::new(Method::GET, "/__admin/collections"))
            .unwrap();
        assert_eq!(collections.body(), Some(&json!([{"name": "items", "count": 1}])));

        let reset = router
            .handle(&ApiRequest::new(Method::DELETE, "/__admin/collections"))
            .unwrap();
        assert_eq!(reset.status(), StatusCode::NO_CONTENT);
        assert!(store.collections().is_empty());
    }
}
