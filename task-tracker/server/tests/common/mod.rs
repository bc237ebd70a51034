#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Serialize;
use std::collections::BTreeMap;
use task_tracker_server::config::Config;
use tower::ServiceExt;

/// Opens a fresh in-memory SQLite database with the task schema applied.
///
/// The pool is capped at one connection because every SQLite `:memory:`
/// connection is its own database.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await?;
    task_tracker_server::database::ensure_schema(&db).await?;
    Ok(db)
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 8000,
        cors_origins: "http://localhost:5173".to_string(),
        max_connections: Some(1),
    }
}

/// Builds the full application router on a fresh database.
pub async fn setup_app() -> anyhow::Result<Router> {
    let db = setup_db().await?;
    task_tracker_server::web::create_app(&test_config(), db)
}

/// A response split into the parts tests look at.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Sends one request through the router, with an optional JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    json: Option<serde_json::Value>,
) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match json {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// HTTP response snapshot for testing endpoints.
#[derive(Debug, Serialize)]
pub struct HttpResponseSnapshot {
    pub test_context: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
}

impl HttpResponseSnapshot {
    pub fn new(response: &TestResponse, test_context: &str) -> Self {
        Self {
            test_context: test_context.to_string(),
            status: response.status.as_u16(),
            headers: filter_variable_headers(&response.headers),
            body: response.body.clone(),
        }
    }
}

/// Filter out variable and CORS headers from response headers for snapshot testing.
fn filter_variable_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let variable_headers = ["date", "content-length", "vary"];

    headers
        .iter()
        .filter_map(|(name, value)| {
            let name_str = name.as_str().to_lowercase();
            if variable_headers.contains(&name_str.as_str())
                || name_str.starts_with("access-control-")
            {
                None
            } else {
                value.to_str().ok().map(|v| (name_str, v.to_string()))
            }
        })
        .collect()
}
