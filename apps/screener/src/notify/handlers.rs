//! Axum route handler for the Email API.

use axum::{extract::State, http::HeaderMap, Form, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::notify::campaign::{run_campaign, CampaignSettings, NotifyError, SmtpMailer};
use crate::results::handlers::{latest_results_path, NO_RESULTS_MESSAGE};
use crate::results::store::read_results;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendEmailsRequest {
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_password: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailsResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/v1/emails
///
/// Emails every candidate in the session's latest results, picking the
/// template by score threshold. SMTP work runs on the blocking pool.
pub async fn handle_send_emails(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<SendEmailsRequest>,
) -> Result<Json<SendEmailsResponse>, AppError> {
    let sender_email = request.sender_email.trim().to_string();
    let sender_password = request.sender_password.trim().to_string();
    if sender_email.is_empty() || sender_password.is_empty() {
        return Err(AppError::Validation(
            "Please provide sender email and password".to_string(),
        ));
    }

    let path = latest_results_path(&state, &headers)
        .await
        .ok_or_else(|| AppError::Validation(NO_RESULTS_MESSAGE.to_string()))?;

    let smtp_server = state.config.smtp_server.clone();
    let settings = CampaignSettings {
        threshold: state.config.email_score_threshold,
        position: state.config.position_title.clone(),
        subject: state.config.email_subject.clone(),
    };

    let report = tokio::task::spawn_blocking(move || {
        let table = read_results(&path)?;
        let mailer = SmtpMailer::new(&smtp_server, &sender_email, &sender_password)?;
        run_campaign(&table, &mailer, &settings)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
    .map_err(|e: NotifyError| AppError::Email(format!("Error sending emails: {e}")))?;

    Ok(Json(SendEmailsResponse {
        success: true,
        message: report.message(),
    }))
}
