//! webvault-api - HTTP API server for WebVault

mod config;
mod envelope;
mod handlers;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use webvault_core::ValidationErrors;
use webvault_db::Database;

use config::AppConfig;
use envelope::{is_unique_violation, JSend};
use services::{FaviconService, WebsiteService};

/// Request bodies are small JSON documents; 1 MB is generous.
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically in logs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub websites: WebsiteService,
    pub favicon: FaviconService,
    pub config: Arc<AppConfig>,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// HTTP-facing error for the JSend endpoints.
///
/// Coded-envelope endpoints do their own mapping (see
/// [`envelope::coded_error_response`]); everything else converts core errors
/// through `From` and lets `IntoResponse` shape the body.
#[derive(Debug)]
pub enum ApiError {
    Internal(webvault_core::Error),
    Validation(ValidationErrors),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<webvault_core::Error> for ApiError {
    fn from(err: webvault_core::Error) -> Self {
        match err {
            webvault_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            webvault_core::Error::WebsiteNotFound(id) => {
                ApiError::NotFound(format!("website {} not found", id))
            }
            webvault_core::Error::Validation(errors) => ApiError::Validation(errors),
            webvault_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            webvault_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            webvault_core::Error::Database(ref db_err) if is_unique_violation(db_err) => {
                let msg = db_err.to_string();
                // Friendly messages for known constraints
                let friendly = if msg.contains("tag_slug") || msg.contains("tag_name") {
                    "A tag with this slug already exists".to_string()
                } else if msg.contains("website_url") {
                    "A website with this URL already exists".to_string()
                } else {
                    "A record with the same unique value already exists".to_string()
                };
                ApiError::Conflict(friendly)
            }
            err => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(JSend::error("Internal server error", None)),
                )
                    .into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(JSend::fail(&errors)),
            )
                .into_response(),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                Json(JSend::fail_with("session", &msg)),
            )
                .into_response(),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(JSend::fail_with("id", &msg))).into_response()
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(JSend::fail_with("request", &msg)),
            )
                .into_response(),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                Json(JSend::fail_with("conflict", &msg)),
            )
                .into_response(),
        }
    }
}

// =============================================================================
// HEALTH
// =============================================================================

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // A trivial query proves the pool is alive.
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
        .map_err(webvault_core::Error::from)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

// =============================================================================
// LOGGING
// =============================================================================

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
///   RUST_LOG    - standard env filter (default: "webvault_api=debug,tower_http=debug")
///
/// Returns the appender guard, which must live as long as the process when
/// file logging is enabled.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "webvault_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = config.log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("webvault-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if config.log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if config.log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
        None
    };

    info!(
        log_format = %config.log_format,
        log_file = config.log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

// =============================================================================
// ROUTER
// =============================================================================

fn build_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public browsing
        .route(
            "/api/websites",
            get(handlers::websites::list_websites).post(handlers::websites::submit_website),
        )
        .route("/api/websites/:id", get(handlers::websites::get_website))
        .route(
            "/api/websites/:id/visit",
            post(handlers::websites::record_visit),
        )
        .route("/api/categories", get(handlers::websites::list_categories))
        .route(
            "/api/collections",
            get(handlers::collections::list_collections),
        )
        .route(
            "/api/collections/:id",
            get(handlers::collections::get_collection),
        )
        .route("/api/posts", get(handlers::blog::list_posts))
        .route("/api/posts/:slug", get(handlers::blog::get_post))
        .route("/api/favicon", get(handlers::favicon::get_favicon))
        // Tag management (coded envelope)
        .route(
            "/api/tags",
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route(
            "/api/tags/:id",
            patch(handlers::tags::update_tag).delete(handlers::tags::delete_tag),
        )
        .route(
            "/api/tags/by-slug/:slug",
            get(handlers::tags::get_tag_by_slug),
        )
        // Auth
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        // Admin review surface
        .route("/api/admin/websites", get(handlers::admin::list_websites))
        .route(
            "/api/admin/websites/bulk-review",
            post(handlers::admin::bulk_review_websites),
        )
        .route(
            "/api/admin/websites/:id/status",
            post(handlers::admin::update_website_status),
        )
        .route(
            "/api/admin/submissions",
            get(handlers::admin::list_submissions),
        )
        .route(
            "/api/admin/submissions/:id",
            get(handlers::admin::get_submission),
        )
        .route(
            "/api/admin/submissions/:id/review",
            post(handlers::admin::review_submission),
        )
        .route(
            "/api/admin/audit-logs",
            get(handlers::admin::list_audit_logs),
        )
        // Middleware
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(&config);

    // Connect to database and run pending migrations
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    webvault_db::log_pool_metrics(&db.pool);

    let state = AppState {
        websites: WebsiteService::new(db.clone()),
        favicon: FaviconService::new(),
        db,
        config: Arc::new(config.clone()),
    };

    let app = build_router(state);

    let addr: SocketAddr = config.bind_addr;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_http_categories() {
        let err: ApiError = webvault_core::Error::NotFound("tag x".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = webvault_core::Error::InvalidInput("bad".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = webvault_core::Error::Unauthorized("no session".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let mut errors = ValidationErrors::new();
        errors.add("url", "must be http or https");
        let err: ApiError = webvault_core::Error::Validation(errors).into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = webvault_core::Error::Internal("boom".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
