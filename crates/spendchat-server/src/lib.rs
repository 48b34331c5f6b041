//! SpendChat Web Server
//!
//! Axum-based REST API for the SpendChat assistant:
//! - `POST /api/chat` runs a message through the chat dispatcher
//! - `GET /api/expenses` and `GET /api/spending-by-category` expose the store
//! - `GET /health` liveness probe
//! - Static single-page chat client served from a directory

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use spendchat_core::ai::{AIBackend, AIClient};
use spendchat_core::{ChatDispatcher, Database};

mod handlers;

/// Environment variable holding a comma-separated CORS origin allow-list
pub const CORS_ORIGINS_ENV: &str = "SPENDCHAT_CORS_ORIGINS";

/// Server configuration
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read the origin allow-list from `SPENDCHAT_CORS_ORIGINS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(CORS_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub dispatcher: ChatDispatcher,
}

/// Create the application router, configuring the remote model from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_ai(db, static_dir, config, AIClient::from_env())
}

/// Create the application router with an explicit AI client (for testing)
pub fn create_router_with_ai(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AIClient>,
) -> Router {
    let state = Arc::new(AppState {
        dispatcher: ChatDispatcher::new(db.clone(), ai),
        db,
    });

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/expenses", get(handlers::list_expenses))
        .route("/spending-by-category", get(handlers::spending_by_category));

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health));

    // Static client: `/static/*` and any unmatched path
    if let Some(dir) = static_dir {
        app = app
            .nest_service("/static", ServeDir::new(dir))
            .fallback_service(ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with default configuration
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
///
/// Port 0 binds an OS-assigned free port; the bound address is logged.
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if let Some(dir) = static_dir {
        if !std::path::Path::new(dir).is_dir() {
            warn!("Static directory {} not found, only the API will be served", dir);
        }
    }

    let ai = AIClient::from_env();
    check_ai_connection(ai.as_ref()).await;

    let app = create_router_with_ai(db, static_dir, config, ai);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log remote model connection status
async fn check_ai_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ Remote model reachable: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  Remote model configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  Remote model not configured (set OPENAI_API_KEY to enable it)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with an HTTP status code
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // The failure description is returned to the client
            message: err.to_string(),
        }
    }
}
