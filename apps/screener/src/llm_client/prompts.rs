// Prompt constants for resume-vs-job-description analysis.

/// System prompt that pins the model to JSON-only output.
pub const RESUME_ANALYSIS_SYSTEM: &str = "You are a resume analysis expert. \
    You will compare the Resume and Job Description and provide the output ONLY in valid JSON format. \
    Do not include any explanatory text before or after the JSON.";

/// Analysis prompt template. Replace `{resume}` and `{job_description}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = "Analyze the resume against the job description:
Resume: {resume}
Job Description: {job_description}
Provide a JSON response with these exact keys: Name, email, is_perfect, is_okay, \
Matching Score in percentage, strong zone, Lack of Knowledge. \
Make sure the response is valid JSON format only, no additional text.";

/// Fills the analysis template. The job description goes in first, so a
/// literal `{job_description}` inside resume text stays as written.
pub fn resume_analysis_prompt(resume: &str, job_description: &str) -> String {
    RESUME_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume}", resume)
}
