//! Resume analysis: pluggable, trait-based comparison of resume text against a JD.
//!
//! Default: `LlmResumeAnalyzer` (chat-completions call with the JSON-only prompt).
//! Tests swap in canned implementations; the batch loop only sees the trait.

use async_trait::async_trait;

use crate::llm_client::prompts::{resume_analysis_prompt, RESUME_ANALYSIS_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

/// Produces the raw LLM reply for one resume. The reply is not interpreted
/// here; `normalizer::normalize_response` does that.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, resume_text: &str, job_description: &str)
        -> Result<String, LlmError>;
}

pub struct LlmResumeAnalyzer(pub LlmClient);

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, LlmError> {
        let prompt = resume_analysis_prompt(resume_text, job_description);
        self.0.complete(&prompt, RESUME_ANALYSIS_SYSTEM).await
    }
}
