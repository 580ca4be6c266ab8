// POST /api/analyze: start a background analysis
// DELETE /api/analyze/{company}: cancel a running one
//
// POST returns 202 Accepted when the job starts, 400 for an invalid request,
// and 409 Conflict if the same company is already being analyzed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::company_key;
use crate::pipeline::{validate_request, DEFAULT_ARTICLES};
use crate::web::analysis_job::{launch_analysis, JobStatus};
use crate::web::{analysis_error_response, api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub company_name: String,
    pub num_articles: Option<usize>,
}

pub async fn start_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let count = request.num_articles.unwrap_or(DEFAULT_ARTICLES);
    let company = match validate_request(&request.company_name, count) {
        Ok(company) => company,
        Err(e) => return analysis_error_response(&e),
    };
    let key = company_key(&company);

    let mut jobs = state.jobs.write().await;
    if jobs.get(&key).is_some_and(|job| job.running) {
        return api_error(
            StatusCode::CONFLICT,
            &format!("An analysis for {company} is already running"),
        );
    }

    let job = JobStatus::started(&company, count);
    let cancel = job.cancel.clone();
    jobs.insert(key.clone(), job);
    drop(jobs);

    launch_analysis(
        state.analyzer.clone(),
        state.jobs.clone(),
        key,
        company.clone(),
        count,
        cancel,
    );

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "Analysis started",
            "company": company,
            "num_articles": count,
        })),
    )
        .into_response()
}

pub async fn cancel_analysis(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Response {
    let jobs = state.jobs.read().await;
    match jobs.get(&company_key(&company)) {
        Some(job) if job.running => {
            job.cancel.cancel();
            (
                StatusCode::ACCEPTED,
                Json(serde_json::json!({ "message": "Cancellation requested" })),
            )
                .into_response()
        }
        _ => api_error(
            StatusCode::NOT_FOUND,
            &format!("No running analysis for {}", company.trim()),
        ),
    }
}
