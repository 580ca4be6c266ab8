// GET /api/jobs/{company}: status of the latest background job.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::company_key;
use crate::web::{api_error, AppState};

pub async fn get_job(State(state): State<AppState>, Path(company): Path<String>) -> Response {
    let jobs = state.jobs.read().await;
    match jobs.get(&company_key(&company)) {
        Some(job) => Json(job.clone()).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            &format!("No analysis job for {}", company.trim()),
        ),
    }
}
