//! End-to-end behaviour of the mock API over real HTTP.

use axum::http::StatusCode;
use mock_server::config::RouteConfig;
use mock_server::{handler_fn, ApiRequest, ApiResponse, MockServerConfig, Router};
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_create_then_read_back() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/users"))
        .json(&json!({"name": "ada"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created, json!({"id": 1, "name": "ada"}));

    let res = client.get(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), created);

    let res = client.get(server.url("/users")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!([created]));
}

#[tokio::test]
async fn test_unknown_collection_is_empty_list() {
    let server = common::spawn_default().await;

    let res = reqwest::get(server.url("/widgets")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_update_and_patch() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/users"))
        .json(&json!({"name": "ada", "role": "admin"}))
        .send()
        .await
        .unwrap();

    let res = client
        .patch(server.url("/users/1"))
        .json(&json!({"role": "owner"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"id": 1, "name": "ada", "role": "owner"})
    );

    let res = client
        .put(server.url("/users/1"))
        .json(&json!({"name": "grace"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"id": 1, "name": "grace"})
    );
}

#[tokio::test]
async fn test_delete_twice() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/users"))
        .json(&json!({"name": "ada"}))
        .send()
        .await
        .unwrap();

    let res = client.delete(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = client.delete(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request");
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn test_explicit_route_wins_over_mock() {
    let mut routes = Router::new();
    routes
        .register(
            axum::http::Method::GET,
            "/users/{id}",
            handler_fn(|request: &ApiRequest| {
                Ok(ApiResponse::ok(json!({
                    "explicit": true,
                    "id": request.param("id"),
                })))
            }),
        )
        .unwrap();

    let server = common::spawn_server(MockServerConfig::default(), routes).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/users/7")).send().await.unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"explicit": true, "id": "7"})
    );

    // Other methods on the same path still reach the mock.
    let res = client.delete(server.url("/users/7")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_configured_route() {
    let mut config = MockServerConfig::default();
    config.routes.push(RouteConfig {
        method: "GET".into(),
        path: "/health".into(),
        status: 200,
        body: Some(json!({"status": "ok"})),
        headers: [("x-mock".to_string(), "static".to_string())].into(),
    });
    let server = common::spawn_server(config, Router::new()).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-mock").unwrap(), "static");
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"status": "ok"}));
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn test_mount_prefix() {
    let mut config = MockServerConfig::default();
    config.server.mount_prefix = "/api/v1".into();
    let server = common::spawn_server(config, Router::new()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/v1/orders"))
        .json(&json!({"total": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(server.store.len("orders"), 1);

    let res = client.get(server.url("/orders")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mock_disabled() {
    let mut config = MockServerConfig::default();
    config.mock.enabled = false;
    let server = common::spawn_server(config, Router::new()).await;

    let res = reqwest::get(server.url("/users")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_persist_off_echoes_without_storing() {
    let mut config = MockServerConfig::default();
    config.mock.persist = false;
    let server = common::spawn_server(config, Router::new()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/users"))
        .json(&json!({"name": "ada"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "ada");
    assert!(body.get("id").is_some());

    let res = client.get(server.url("/users")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/users"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "abc-123");

    let res = client.get(server.url("/users")).send().await.unwrap();
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_admin_reset() {
    let server = common::spawn_default().await;
    let client = reqwest::Client::new();

    for name in ["ada", "grace"] {
        client
            .post(server.url("/users"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
    }

    let res = client
        .get(server.url("/__admin/collections"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!([{"name": "users", "count": 2}])
    );

    let res = client
        .delete(server.url("/__admin/collections"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(server.store.is_empty());

    // Ids handed out before the reset are not issued again.
    let res = client
        .post(server.url("/users"))
        .json(&json!({"name": "linus"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap()["id"], 3);
    let res = client.get(server.url("/users/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
