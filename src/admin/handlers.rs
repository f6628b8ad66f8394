use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::http::{ApiError, ApiRequest, ApiResponse};
use crate::mock::MockStore;
use crate::routing::RequestHandler;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub mock_enabled: bool,
    pub persist: bool,
}

/// `GET /__admin/status`
pub struct StatusHandler {
    pub mock_enabled: bool,
    pub persist: bool,
}

impl RequestHandler for StatusHandler {
    fn handle(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let status = SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            mock_enabled: self.mock_enabled,
            persist: self.persist,
        };
        serde_json::to_value(status)
            .map(ApiResponse::ok)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}

/// `GET /__admin/collections`
pub struct CollectionsHandler {
    pub store: Arc<MockStore>,
}

impl RequestHandler for CollectionsHandler {
    fn handle(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse::ok(json!(self.store.collections())))
    }
}

/// `DELETE /__admin/collections`
pub struct ResetHandler {
    pub store: Arc<MockStore>,
}

impl RequestHandler for ResetHandler {
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::info!(request_id = ?request.request_id(), "Resetting mock store");
        self.store.clear();
        Ok(ApiResponse::no_content())
    }
}
