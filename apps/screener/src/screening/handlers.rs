//! Axum route handler for the Screening API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::results::store::write_results;
use crate::screening::analyzer::LlmResumeAnalyzer;
use crate::screening::batch::{screen_resumes, ResumeUpload};
use crate::screening::record::CanonicalRecord;
use crate::session::{session_cookie, session_id};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Multipart fields of a screening request, before validation.
#[derive(Debug, Default)]
pub struct ScreeningForm {
    pub job_description: String,
    pub api_key: String,
    pub model_option: Option<String>,
    pub temperature: Option<String>,
    pub files: Vec<ResumeUpload>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<CanonicalRecord>,
    pub results_file: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Screens a batch of resume PDFs against one job description, writes the
/// results CSV and points the caller's session at it.
pub async fn handle_screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart, state.config.max_upload_mb()).await?;

    let job_description = form.job_description.trim().to_string();
    if job_description.is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description".to_string(),
        ));
    }

    let api_key = form.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(AppError::Validation(
            "Please enter your LLM API key".to_string(),
        ));
    }

    if form.files.iter().all(|f| f.filename.is_empty()) {
        return Err(AppError::Validation(
            "Please select PDF files to upload".to_string(),
        ));
    }

    let temperature = match form.temperature.as_deref().map(str::trim) {
        None | Some("") => 0.0,
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|_| AppError::Validation(format!("Invalid temperature: {raw}")))?,
    };
    let model = form
        .model_option
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.config.default_model.clone());

    let llm = LlmClient::new(LlmSettings {
        api_url: state.config.llm_api_url.clone(),
        api_key,
        model,
        temperature,
    })
    .map_err(|e| AppError::Llm(format!("Error initializing LLM: {e}")))?;

    let uploads = pdf_uploads(form.files);
    if uploads.is_empty() {
        return Err(AppError::Validation("No valid PDF files found".to_string()));
    }

    let resume_count = uploads.len();
    info!(
        "Screening {} resume(s) with model {}",
        resume_count,
        llm.model()
    );

    let analyzer = LlmResumeAnalyzer(llm);
    let records = screen_resumes(
        uploads,
        &job_description,
        &analyzer,
        state.config.llm_request_delay,
    )
    .await;

    let results_dir = state.config.results_dir.clone();
    let to_write = records.clone();
    let results_path =
        tokio::task::spawn_blocking(move || write_results(&results_dir, &to_write))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

    let session = session_id(&headers).unwrap_or_else(Uuid::new_v4);
    state
        .sessions
        .set_latest_results(session, results_path.clone())
        .await;

    let response = ScreeningResponse {
        success: true,
        message: format!("Successfully processed {resume_count} resume(s)"),
        results: records,
        results_file: results_path.display().to_string(),
    };

    Ok(([(SET_COOKIE, session_cookie(session))], Json(response)))
}

/// Drains the multipart body into a `ScreeningForm`.
async fn read_form(
    mut multipart: Multipart,
    max_upload_mb: usize,
) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();
    let map_err = |e: MultipartError| AppError::from_multipart(e, max_upload_mb);

    while let Some(field) = multipart.next_field().await.map_err(map_err)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" => form.job_description = field.text().await.map_err(map_err)?,
            "api_key" => form.api_key = field.text().await.map_err(map_err)?,
            "model_option" => form.model_option = Some(field.text().await.map_err(map_err)?),
            "temperature" => form.temperature = Some(field.text().await.map_err(map_err)?),
            "pdf_files" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(map_err)?;
                form.files.push(ResumeUpload { filename, bytes });
            }
            _ => {
                field.bytes().await.map_err(map_err)?;
            }
        }
    }

    Ok(form)
}

/// Keeps `.pdf` uploads, in order, with sanitised filenames.
fn pdf_uploads(files: Vec<ResumeUpload>) -> Vec<ResumeUpload> {
    files
        .into_iter()
        .filter(|f| f.filename.to_lowercase().ends_with(".pdf"))
        .map(|f| ResumeUpload {
            filename: secure_filename(&f.filename),
            bytes: f.bytes,
        })
        .collect()
}

/// Werkzeug-compatible sanitising: non-ASCII dropped, `/` and whitespace runs
/// become a single `_`, characters outside `[A-Za-z0-9._-]` removed, leading
/// and trailing `.`/`_` trimmed. An empty result falls back to `resume.pdf`.
pub fn secure_filename(raw: &str) -> String {
    let ascii: String = raw
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
