//! CSV persistence for screening batches. One file per batch, never rewritten.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::screening::record::CanonicalRecord;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV row read back from disk; every cell is a JSON string.
pub type ResultRow = Map<String, Value>;

/// A results file as read back: header order plus rows.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    pub headers: Vec<String>,
    pub rows: Vec<ResultRow>,
}

/// Writes `records` to a fresh `results_<ts>_<id>.csv` under `dir` and returns its path.
///
/// Columns are the union of all record keys in first-appearance order.
pub fn write_results(dir: &Path, records: &[CanonicalRecord]) -> Result<PathBuf, ResultsError> {
    std::fs::create_dir_all(dir)?;

    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        for key in record.fields().keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let batch_id = Uuid::new_v4().simple().to_string();
    let path = dir.join(format!(
        "results_{}_{}.csv",
        Utc::now().timestamp(),
        &batch_id[..8]
    ));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&headers)?;
    for record in records {
        writer.write_record(
            headers
                .iter()
                .map(|h| record.get(h).map(cell_text).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    info!("Wrote {} result row(s) to {}", records.len(), path.display());
    Ok(path)
}

/// Reads a results file back, keyed by header.
pub fn read_results(path: &Path) -> Result<ResultsTable, ResultsError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: ResultRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(ResultsTable { headers, rows })
}

/// Spreadsheet rendering of a JSON value.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
