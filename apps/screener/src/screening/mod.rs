// Resume screening: PDF text → LLM analysis → canonical record.
// All LLM calls go through llm_client; the normalizer never touches the network.

pub mod analyzer;
pub mod batch;
pub mod handlers;
pub mod normalizer;
pub mod pdf;
pub mod record;
