//! Candidate email campaign over a results table.
//!
//! Score < threshold → rejection email listing the candidate's gaps;
//! otherwise → advance email. Individual send failures are logged and
//! counted, never fatal.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::notify::templates::{AdvanceTemplate, RejectionTemplate};
use crate::results::store::{ResultRow, ResultsError, ResultsTable};
use crate::results::summary::parse_score;
use crate::screening::record::{FIELD_EMAIL, FIELD_LACK_OF_KNOWLEDGE, FIELD_NAME};

/// Score columns tried in order before falling back to any column mentioning "score".
const SCORE_COLUMNS: [&str; 5] = [
    "Matching Score in percentage",
    "Matching Score",
    "Score",
    "matching_score",
    "score",
];

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No score column found in the data")]
    NoScoreColumn,

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error(transparent)]
    Results(#[from] ResultsError),
}

/// Delivers one plain-text email.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SMTP relay mailer authenticated as the sender.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        server: &str,
        sender_email: &str,
        sender_password: &str,
    ) -> Result<Self, NotifyError> {
        let from: Mailbox = sender_email.parse()?;
        let creds = Credentials::new(sender_email.to_string(), sender_password.to_string());
        let transport = SmtpTransport::relay(server)?.credentials(creds).build();
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        self.transport.send(&message)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CampaignSettings {
    pub threshold: i64,
    pub position: String,
    pub subject: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignReport {
    pub sent: usize,
    pub total: usize,
}

impl CampaignReport {
    pub fn message(&self) -> String {
        format!("Successfully sent {}/{} emails", self.sent, self.total)
    }
}

/// Picks the column holding the matching score.
pub fn find_score_column(headers: &[String]) -> Option<&str> {
    SCORE_COLUMNS
        .iter()
        .find(|c| headers.iter().any(|h| h == *c))
        .copied()
        .or_else(|| {
            headers
                .iter()
                .find(|h| h.to_lowercase().contains("score"))
                .map(String::as_str)
        })
}

/// Emails every candidate in `table` through `mailer`.
pub fn run_campaign(
    table: &ResultsTable,
    mailer: &dyn Mailer,
    settings: &CampaignSettings,
) -> Result<CampaignReport, NotifyError> {
    let score_column = find_score_column(&table.headers).ok_or(NotifyError::NoScoreColumn)?;
    debug!("Using score column '{score_column}'");

    let mut sent = 0;
    for row in &table.rows {
        let name = cell(row, FIELD_NAME, "Unknown");
        let email = cell(row, FIELD_EMAIL, "unknown@email.com");
        let score = row.get(score_column).map(parse_score).unwrap_or(0);

        let body = if score < settings.threshold {
            RejectionTemplate {
                name,
                position: &settings.position,
                weak_zone: cell(row, FIELD_LACK_OF_KNOWLEDGE, "Not specified"),
            }
            .to_string()
        } else {
            AdvanceTemplate {
                name,
                position: &settings.position,
            }
            .to_string()
        };

        match mailer.send(email, &settings.subject, &body) {
            Ok(()) => sent += 1,
            Err(e) => warn!("Failed to send email to {email}: {e}"),
        }
    }

    let report = CampaignReport {
        sent,
        total: table.rows.len(),
    };
    info!("{}", report.message());
    Ok(report)
}

/// String cell, or `default` when the cell is absent or empty.
fn cell<'a>(row: &'a ResultRow, key: &str, default: &'a str) -> &'a str {
    match row.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => default,
    }
}
