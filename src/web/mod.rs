// Web server: Axum JSON API over the analysis core.
//
// Analyses run as background jobs; clients poll /api/jobs/{company} and then
// fetch /api/results/{company} and /api/audio/{company}. No authentication.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AnalysisError;
use crate::pipeline::Analyzer;

pub mod analysis_job;
pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub jobs: analysis_job::JobTable,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self {
            analyzer,
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(analyzer: Arc<Analyzer>, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState::new(analyzer));

    let addr = format!("{bind}:{port}");
    info!("Newscast API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(handlers::analyze::start_analysis))
        .route(
            "/api/analyze/{company}",
            axum::routing::delete(handlers::analyze::cancel_analysis),
        )
        .route("/api/jobs/{company}", get(handlers::jobs::get_job))
        .route("/api/results/{company}", get(handlers::results::get_result))
        .route("/api/audio/{company}", get(handlers::results::get_audio))
        .route("/api/companies", get(handlers::results::list_companies))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check, always 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// Map a core error onto an HTTP status.
pub fn analysis_error_response(err: &AnalysisError) -> Response {
    let status = match err {
        AnalysisError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
        AnalysisError::Cancelled(_) => StatusCode::CONFLICT,
        AnalysisError::NoDocuments { .. } | AnalysisError::AggregationImpossible { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, &err.to_string())
}
