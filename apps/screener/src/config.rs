use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::session::DEFAULT_SESSION_CAPACITY;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub results_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub llm_api_url: String,
    pub default_model: String,
    /// Pause between consecutive LLM calls within a batch.
    pub llm_request_delay: Duration,
    pub smtp_server: String,
    /// Candidates scoring below this get the rejection email.
    pub email_score_threshold: i64,
    pub position_title: String,
    pub email_subject: String,
    /// Browser sessions remembered before the oldest is evicted.
    pub session_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5000,
            rust_log: "info".to_string(),
            results_dir: PathBuf::from("results"),
            max_upload_bytes: 50 * 1024 * 1024,
            llm_api_url: DEFAULT_API_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            llm_request_delay: Duration::from_millis(1000),
            smtp_server: "smtp.gmail.com".to_string(),
            email_score_threshold: 70,
            position_title: "Machine Learning".to_string(),
            email_subject: "Response to Your ML Engineer Application".to_string(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
            results_dir: std::env::var("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_dir),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            llm_api_url: env_or("LLM_API_URL", defaults.llm_api_url),
            default_model: env_or("DEFAULT_MODEL", defaults.default_model),
            llm_request_delay: Duration::from_millis(parse_env(
                "LLM_REQUEST_DELAY_MS",
                defaults.llm_request_delay.as_millis() as u64,
            )?),
            smtp_server: env_or("SMTP_SERVER", defaults.smtp_server),
            email_score_threshold: parse_env(
                "EMAIL_SCORE_THRESHOLD",
                defaults.email_score_threshold,
            )?,
            position_title: env_or("POSITION_TITLE", defaults.position_title),
            email_subject: env_or("EMAIL_SUBJECT", defaults.email_subject),
            session_capacity: parse_env("SESSION_CAPACITY", defaults.session_capacity)?,
        })
    }

    /// Upload limit in whole megabytes, for user-facing messages.
    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_bytes / (1024 * 1024)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
