use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::models::{ClassificationResult, TranscriptMessage};
use crate::pipeline::DispositionPipeline;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: DispositionPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: DispositionPipeline) -> Self {
        Self {
            pipeline,
            started_at: Utc::now(),
        }
    }
}

/// Create the application router
///
/// `POST /disposition` runs the pipeline; `GET /` and `GET /health` only read state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/disposition", post(classify))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .await
        .context("Server error")
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Disposition Classifier API",
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let tables = state.pipeline.tables();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.pipeline.model_name(),
        "started_at": state.started_at,
        "dispositions": tables.dispositions().len(),
        "grievances": tables.grievances().len(),
    }))
}

async fn classify(
    State(state): State<AppState>,
    Json(transcript): Json<Vec<TranscriptMessage>>,
) -> Result<Json<ClassificationResult>> {
    let result = state.pipeline.classify(&transcript).await?;
    Ok(Json(result))
}
