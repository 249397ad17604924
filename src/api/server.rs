//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::llm::analyzer::PolicyAnalyzer;

use super::{handlers, models::AnalyzeRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<PolicyAnalyzer>,
    pub config: Arc<Config>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    analyzer: Arc<PolicyAnalyzer>,
    config: Arc<Config>,
    port: u16,
) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let app_state = AppState { analyzer, config };

    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        // Policy analysis
        .route("/analyze", post(analyze_handler))
        // Quick demo without an upload
        .route("/demo", get(demo_handler))
        // Add state and middleware
        .with_state(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check().await))
}

/// Analysis handler
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    match handlers::analyze(&state.analyzer, &state.config, request).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(error) => (StatusCode::BAD_REQUEST, Json(error)).into_response(),
    }
}

/// Demo handler
async fn demo_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::demo().await))
}
