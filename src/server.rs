use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::SiteGenError;
use crate::models::{DeployRequest, DeploymentRecord, GeneratedDocument, GenerationRequest};
use crate::service::WebsiteService;

/// Wraps a successful payload with `"success": true`.
#[derive(Debug, Serialize)]
struct Success<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> Success<T> {
    fn new(payload: T) -> Json<Self> {
        Json(Self {
            success: true,
            payload,
        })
    }
}

/// Error envelope returned by every route.
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl From<SiteGenError> for ApiError {
    fn from(err: SiteGenError) -> Self {
        let status = match &err {
            SiteGenError::Validation(_) => StatusCode::BAD_REQUEST,
            SiteGenError::EmptyResponse(_) | SiteGenError::GenerationFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            SiteGenError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "validation",
            message: format!("Invalid JSON: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(kind = self.kind, "{}", self.message);
        } else {
            tracing::warn!(kind = self.kind, "{}", self.message);
        }
        (
            self.status,
            Json(json!({ "error": self.message, "kind": self.kind })),
        )
            .into_response()
    }
}

/// Routes for the website generator API.
pub fn router(service: Arc<WebsiteService>, cfg: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/generate-website", post(generate_website))
        .route("/deploy-website", post(deploy_website))
        .route("/test-model", get(test_model))
        .with_state(service)
        .layer(cors_layer(cfg))
}

fn cors_layer(cfg: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if cfg.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Website Generator API is running!" }))
}

async fn health(State(service): State<Arc<WebsiteService>>) -> impl IntoResponse {
    if service.is_ready() {
        (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "message": "Website generator is ready" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "message": "Website generator is not configured"
            })),
        )
    }
}

async fn generate_website(
    State(service): State<Arc<WebsiteService>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<Success<GeneratedDocument>>, ApiError> {
    let Json(request) = payload?;
    let document = service.generate(&request.prompt).await?;
    Ok(Success::new(document))
}

async fn deploy_website(
    State(service): State<Arc<WebsiteService>>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Json<Success<DeploymentRecord>>, ApiError> {
    let Json(request) = payload?;
    let record = service.deploy(&request.code, &request.prompt)?;
    Ok(Success::new(record))
}

async fn test_model(
    State(service): State<Arc<WebsiteService>>,
) -> Result<impl IntoResponse, ApiError> {
    let check = service.check_model().await?;
    Ok(Json(check))
}

/// Bind and serve until the process is stopped.
pub async fn serve(service: Arc<WebsiteService>, cfg: &Config, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        bind = %listener.local_addr()?,
        model = %service.model(),
        ready = service.is_ready(),
        "Starting website generator HTTP server"
    );
    axum::serve(listener, router(service, cfg)).await?;
    Ok(())
}
