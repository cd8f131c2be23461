//! Column type classification
//!
//! Assigns each column a semantic type describing how its values should be
//! interpreted for charting, independent of storage representation. Runs
//! once at ingest time; the resulting type map is persisted and never
//! recomputed implicitly.

use crate::data::{Column, DataType, Table, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Columns with fewer distinct values than this are categorical;
/// at or above it they are free text.
pub const CATEGORICAL_LIMIT: usize = 20;

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Numeric,
    Datetime,
    Categorical,
    Text,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Numeric => "numeric",
            SemanticType::Datetime => "datetime",
            SemanticType::Categorical => "categorical",
            SemanticType::Text => "text",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify every column of a table.
///
/// Total and deterministic: a column that fits no other rule is text.
pub fn classify(table: &Table) -> HashMap<String, SemanticType> {
    table
        .columns()
        .map(|col| (col.name().to_string(), classify_column(col)))
        .collect()
}

/// Classify a single column.
///
/// Storage-type checks come first because they are cheap and unambiguous;
/// the full-column datetime parse only runs for generic (string or mixed)
/// columns.
pub fn classify_column(col: &Column) -> SemanticType {
    match col.data_type() {
        dt if dt.is_numeric() => SemanticType::Numeric,
        DataType::Timestamp => SemanticType::Datetime,
        DataType::String | DataType::Mixed => {
            if all_parse_as_datetime(col) {
                SemanticType::Datetime
            } else if col.count_distinct() < CATEGORICAL_LIMIT {
                SemanticType::Categorical
            } else {
                SemanticType::Text
            }
        }
        _ => SemanticType::Text,
    }
}

/// Whether every non-missing value in the column parses as a date/time.
/// A column with no non-missing values passes vacuously.
fn all_parse_as_datetime(col: &Column) -> bool {
    col.non_missing().all(|v| match v {
        Value::Timestamp(_) => true,
        Value::String(s) => parse_datetime(s).is_some(),
        _ => false,
    })
}

/// Fallible datetime parse, returning epoch microseconds.
/// Bare numbers are rejected: a column of numeric-looking strings is not
/// a datetime column.
pub(crate) fn parse_datetime(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || s.parse::<f64>().is_ok() {
        return None;
    }
    // Datetime with optional fractional seconds
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_micros());
    }
    // Date only (midnight)
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_micros());
        }
    }
    None
}
