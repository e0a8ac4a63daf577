// Results: CSV persistence of screening batches and the summaries built from them.

pub mod handlers;
pub mod store;
pub mod summary;
