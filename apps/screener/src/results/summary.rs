//! Results summary: headline counts plus rows ranked by matching score.

use std::cmp::Reverse;

use serde::Serialize;
use serde_json::Value;

use crate::results::store::{ResultRow, ResultsTable};
use crate::screening::record::{FIELD_IS_OKAY, FIELD_IS_PERFECT, FIELD_SCORE};

/// Spellings of a true flag as they come back from the CSV.
const TRUTHY_FLAGS: [&str; 4] = ["True", "true", "TRUE", "1"];

#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub total_resumes: usize,
    pub perfect_candidates: usize,
    pub okay_candidates: usize,
    /// Mean matching score, one decimal place.
    pub avg_score: f64,
    /// Rows ranked by matching score, highest first. Ties keep file order.
    pub results: Vec<ResultRow>,
}

pub fn summarize(table: ResultsTable) -> ResultsSummary {
    let rows = table.rows;
    let total_resumes = rows.len();
    let perfect_candidates = rows.iter().filter(|r| is_flag_set(r, FIELD_IS_PERFECT)).count();
    let okay_candidates = rows.iter().filter(|r| is_flag_set(r, FIELD_IS_OKAY)).count();

    let avg_score = if rows.is_empty() {
        0.0
    } else {
        let total: f64 = rows.iter().map(|r| row_score(r) as f64).sum();
        let mean = total / rows.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    let mut results = rows;
    results.sort_by_key(|r| Reverse(row_score(r)));

    ResultsSummary {
        total_resumes,
        perfect_candidates,
        okay_candidates,
        avg_score,
        results,
    }
}

/// Parses a matching score such as `"83%"`, `"83.9"` or `83` to a whole percentage.
/// Anything unparseable or non-finite counts as 0; huge values saturate.
pub fn parse_score(value: &Value) -> i64 {
    let score = match value {
        Value::String(s) => s.replace('%', "").trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    match score {
        Some(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

fn row_score(row: &ResultRow) -> i64 {
    row.get(FIELD_SCORE).map(parse_score).unwrap_or(0)
}

fn is_flag_set(row: &ResultRow, field: &str) -> bool {
    match row.get(field) {
        Some(Value::String(s)) => TRUTHY_FLAGS.contains(&s.as_str()),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}
