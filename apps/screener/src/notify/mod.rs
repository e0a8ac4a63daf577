// Candidate notification emails, driven by a session's results CSV.

pub mod campaign;
pub mod handlers;
pub mod templates;
