//! Concurrent writes against a single server.

use std::collections::HashSet;

use axum::http::StatusCode;
use futures_util::future::join_all;
use mock_server::config::IdStrategy;
use mock_server::{MockServerConfig, Router};
use serde_json::{json, Value};

mod common;

async fn create_many(server: &common::TestServer, collection: &str, total: usize) -> Vec<Value> {
    let client = reqwest::Client::new();
    let url = server.url(&format!("/{}", collection));

    let requests = (0..total).map(|i| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let res = client
                .post(&url)
                .json(&json!({ "seq": i }))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            res.json::<Value>().await.unwrap()
        }
    });

    join_all(requests).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let server = common::spawn_default().await;
    let total = 100;

    let created = create_many(&server, "events", total).await;

    let ids: HashSet<u64> = created
        .iter()
        .map(|record| record["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids.len(), total);
    assert_eq!(ids.iter().copied().min(), Some(1));
    assert_eq!(ids.iter().copied().max(), Some(total as u64));
    assert_eq!(server.store.len("events"), total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_uuid_ids() {
    let mut config = MockServerConfig::default();
    config.mock.id_strategy = IdStrategy::Uuid;
    let server = common::spawn_server(config, Router::new()).await;
    let total = 50;

    let created = create_many(&server, "sessions", total).await;

    let ids: HashSet<String> = created
        .iter()
        .map(|record| record["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), total);

    let one = ids.iter().next().unwrap();
    let res = reqwest::get(server.url(&format!("/sessions/{}", one)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_collections_are_independent_under_load() {
    let server = common::spawn_default().await;

    let (a, b) = tokio::join!(
        create_many(&server, "alpha", 30),
        create_many(&server, "beta", 20)
    );
    assert_eq!(a.len(), 30);
    assert_eq!(b.len(), 20);
    assert_eq!(server.store.len("alpha"), 30);
    assert_eq!(server.store.len("beta"), 20);
}
