#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use predicate_search::config::AppConfig;
use predicate_search::startup::{build_router, build_state};
use serde_json::{json, Value};

/// App over an in-memory store, optionally seeded with the sample people
pub async fn setup_test_app(seed_samples: bool) -> Result<Router, Box<dyn std::error::Error>> {
    let mut app_config = AppConfig::default_config();
    app_config.session.seed_samples = seed_samples;

    let state = build_state(&app_config).await?;
    Ok(build_router(state))
}

pub async fn seeded_server() -> TestServer {
    let app = setup_test_app(true).await.unwrap();
    TestServer::new(app).unwrap()
}

pub async fn empty_server() -> TestServer {
    let app = setup_test_app(false).await.unwrap();
    TestServer::new(app).unwrap()
}

pub fn comparison(depth: usize, field: &str, operator: &str, value: Value) -> Value {
    json!({
        "type": "comparison",
        "depth": depth,
        "field": field,
        "operator": operator,
        "value": value
    })
}

pub fn group(depth: usize, logical_type: &str) -> Value {
    json!({"type": "group", "depth": depth, "logicalType": logical_type})
}

/// PUT the rows and return the predicate view
pub async fn put_rows(server: &TestServer, rows: Vec<Value>) -> Value {
    let response = server
        .put("/api/predicate")
        .json(&json!({ "rows": rows }))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Last names of the displayed persons, in display order
pub async fn displayed_last_names(server: &TestServer) -> Vec<String> {
    let body: Value = server.get("/api/persons").await.json();
    body["displayed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["lastName"].as_str().unwrap().to_string())
        .collect()
}
