//! Axum route handlers for the Results API.

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap,
    },
    response::IntoResponse,
    Json,
};

use crate::errors::AppError;
use crate::results::store::read_results;
use crate::results::summary::{summarize, ResultsSummary};
use crate::session::session_id;
use crate::state::AppState;

pub const NO_RESULTS_MESSAGE: &str = "No results file found. Please run analysis first.";
const DOWNLOAD_NAME: &str = "resume_analysis_results.csv";

/// Latest results file of the caller's session, if any.
pub async fn latest_results_path(state: &AppState, headers: &HeaderMap) -> Option<PathBuf> {
    let session = session_id(headers)?;
    state.sessions.latest_results(session).await
}

/// GET /api/v1/results
///
/// Headline counts and score-ranked rows for the session's latest batch.
pub async fn handle_results_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ResultsSummary>, AppError> {
    let path = latest_results_path(&state, &headers)
        .await
        .ok_or_else(|| AppError::NotFound(NO_RESULTS_MESSAGE.to_string()))?;

    let table = tokio::task::spawn_blocking(move || read_results(&path))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok(Json(summarize(table)))
}

/// GET /api/v1/results/download
///
/// The session's latest results CSV as an attachment.
pub async fn handle_download_results(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let path = latest_results_path(&state, &headers)
        .await
        .ok_or_else(|| AppError::NotFound(NO_RESULTS_MESSAGE.to_string()))?;

    let body = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        body,
    ))
}
