use axum::http::HeaderValue;
use axum::response::Json;
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};

use crate::config::{self, Config};
use crate::database;
use crate::task::{TaskState, create_task_router};

pub mod error;
pub mod extract;
pub mod session;

/// Greeting returned by the root endpoint.
pub const GREETING: &str = "Hello! The task tracker server is running.";

/// JSON body of the root endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootMessage {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::web::create_task_handler,
        crate::task::web::list_tasks_handler,
        crate::task::web::get_task_handler,
        crate::task::web::update_task_handler,
        crate::task::web::delete_task_handler,
    ),
    components(schemas(
        crate::task::TaskCreate,
        crate::task::TaskUpdate,
        crate::task::TaskRead,
        crate::entities::sea_orm_active_enums::TaskStatus,
        error::ErrorDetail,
        RootMessage,
    )),
    tags((name = "Tasks", description = "Create, read, update and delete tasks"))
)]
pub struct ApiDoc;

/// Builds the CORS layer for the configured frontend origins.
pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config
        .allowed_origins()
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Assembles the application router on top of an established connection pool.
pub fn create_app(config: &Config, db: sea_orm::DatabaseConnection) -> anyhow::Result<Router> {
    let task_state = TaskState { db: Arc::new(db) };

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check_handler))
        .route("/openapi.json", get(openapi_handler))
        .merge(create_task_router(task_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)?),
        );

    Ok(app)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let db = database::connect(&config).await?;
    database::ensure_schema(&db).await?;

    let app = create_app(&config, db)?;

    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn root_handler() -> Json<RootMessage> {
    Json(RootMessage {
        message: GREETING.to_string(),
    })
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_origins(cors_origins: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            port: 8000,
            cors_origins: cors_origins.to_string(),
            max_connections: None,
        }
    }

    #[test]
    fn can_build_cors_layer_for_configured_origins() {
        let config = config_with_origins("http://localhost:5173,https://tasks.example.com");
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn rejects_origins_that_are_not_header_values() {
        let config = config_with_origins("http://localhost:5173,bad\norigin");
        assert!(cors_layer(&config).is_err());
    }

    #[test]
    fn can_document_every_task_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|path| path.as_str() == "/tasks/"));
        assert!(paths.iter().any(|path| path.as_str() == "/tasks/{task_id}"));
    }
}
