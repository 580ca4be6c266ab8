// Stored result handlers.
//
// GET /api/results/{company}: latest AnalysisResult as JSON
// GET /api/audio/{company}: narration audio (audio/mpeg)
// GET /api/companies: companies with a stored result

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::AnalysisResult;
use crate::narration::traits::AUDIO_MPEG;
use crate::output::audio_file_name;
use crate::web::{analysis_error_response, AppState};

/// Result JSON plus the analyzed-versus-requested counts.
#[derive(Serialize)]
struct ResultResponse<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    articles_analyzed: usize,
    articles_requested: usize,
    partial: bool,
}

pub async fn get_result(State(state): State<AppState>, Path(company): Path<String>) -> Response {
    match state.analyzer.get_result(&company).await {
        Ok(result) => Json(ResultResponse {
            articles_analyzed: result.articles_analyzed(),
            articles_requested: result.requested_count,
            partial: result.is_partial(),
            result: &result,
        })
        .into_response(),
        Err(e) => analysis_error_response(&e),
    }
}

pub async fn get_audio(State(state): State<AppState>, Path(company): Path<String>) -> Response {
    match state.analyzer.get_audio(&company).await {
        Ok(bytes) => {
            let disposition = format!("inline; filename=\"{}\"", audio_file_name(&company));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, AUDIO_MPEG.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => analysis_error_response(&e),
    }
}

pub async fn list_companies(State(state): State<AppState>) -> Response {
    match state.analyzer.list_companies().await {
        Ok(companies) => Json(serde_json::json!({ "companies": companies })).into_response(),
        Err(e) => analysis_error_response(&e),
    }
}
