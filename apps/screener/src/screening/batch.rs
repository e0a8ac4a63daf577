//! Batch screening: one record per uploaded resume, in upload order.
//!
//! Per resume: extract text → analyze → normalize. Extraction and analysis
//! failures become error-flavored records instead of aborting the batch.

use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use crate::screening::analyzer::ResumeAnalyzer;
use crate::screening::normalizer::normalize_response;
use crate::screening::pdf::extract_resume_text;
use crate::screening::record::CanonicalRecord;

/// One uploaded resume.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Screens every upload sequentially. `request_delay` is slept after each
/// analysis call to stay under provider rate limits.
pub async fn screen_resumes(
    uploads: Vec<ResumeUpload>,
    job_description: &str,
    analyzer: &dyn ResumeAnalyzer,
    request_delay: Duration,
) -> Vec<CanonicalRecord> {
    let total = uploads.len();
    let mut records = Vec::with_capacity(total);

    for (idx, upload) in uploads.into_iter().enumerate() {
        info!("Screening resume {}/{}: {}", idx + 1, total, upload.filename);

        let resume_text = extract_resume_text(&upload.filename, upload.bytes).await;
        if resume_text.trim().is_empty() {
            warn!("No text extracted from {}", upload.filename);
            records.push(CanonicalRecord::extraction_failed(&upload.filename));
            continue;
        }

        let record = screen_text(&upload.filename, &resume_text, job_description, analyzer).await;
        records.push(record);

        if !request_delay.is_zero() {
            tokio::time::sleep(request_delay).await;
        }
    }

    records
}

/// Analyzes already-extracted resume text and normalizes the reply.
pub async fn screen_text(
    filename: &str,
    resume_text: &str,
    job_description: &str,
    analyzer: &dyn ResumeAnalyzer,
) -> CanonicalRecord {
    match analyzer.analyze(resume_text, job_description).await {
        Ok(raw) => normalize_response(&raw),
        Err(e) => {
            warn!("Analysis of {filename} failed: {e}");
            CanonicalRecord::processing_failed(filename, &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::screening::record::{FIELD_LACK_OF_KNOWLEDGE, FIELD_SCORE, FIELD_STRONG_ZONE};

    /// Replays canned replies in order and records what it was asked.
    struct ScriptedAnalyzer {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedAnalyzer {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResumeAnalyzer for ScriptedAnalyzer {
        async fn analyze(
            &self,
            resume_text: &str,
            _job_description: &str,
        ) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(resume_text.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn upload(filename: &str, bytes: &'static [u8]) -> ResumeUpload {
        ResumeUpload {
            filename: filename.to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn test_screen_text_normalizes_reply() {
        let analyzer = ScriptedAnalyzer::new(vec![Ok(
            "```json\n{\"name\": \"Ada\", \"score\": \"88%\"}\n```".to_string(),
        )]);
        let record = screen_text("ada.pdf", "resume", "jd", &analyzer).await;
        assert_eq!(record.name(), Some("Ada"));
        assert_eq!(record.get(FIELD_SCORE), Some(&Value::from("88%")));
        assert_eq!(*analyzer.seen.lock().unwrap(), vec!["resume".to_string()]);
    }

    #[tokio::test]
    async fn test_screen_text_analysis_error_becomes_error_record() {
        let analyzer = ScriptedAnalyzer::new(vec![Err(LlmError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
        })]);
        let record = screen_text("bob.pdf", "resume", "jd", &analyzer).await;
        assert_eq!(record.name(), Some("Error: bob.pdf"));
        assert_eq!(
            record.get(FIELD_STRONG_ZONE),
            Some(&Value::from("Processing failed"))
        );
        assert_eq!(
            record.get(FIELD_LACK_OF_KNOWLEDGE),
            Some(&Value::from("Error: API error (status 401): Invalid API Key"))
        );
    }

    #[tokio::test]
    async fn test_unreadable_pdfs_skip_the_analyzer_and_keep_order() {
        let analyzer = ScriptedAnalyzer::new(vec![]);
        let records = screen_resumes(
            vec![upload("first.pdf", b"not a pdf"), upload("second.pdf", b"")],
            "jd",
            &analyzer,
            Duration::ZERO,
        )
        .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), Some("Error: first.pdf"));
        assert_eq!(records[1].name(), Some("Error: second.pdf"));
        assert_eq!(
            records[0].get(FIELD_LACK_OF_KNOWLEDGE),
            Some(&Value::from("PDF text extraction failed"))
        );
        assert!(analyzer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let analyzer = ScriptedAnalyzer::new(vec![]);
        let records = screen_resumes(vec![], "jd", &analyzer, Duration::ZERO).await;
        assert!(records.is_empty());
    }
}
