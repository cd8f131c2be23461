//! Per-column summarization for chart rendering
//!
//! Produces a cleaned, JSON-safe value sequence plus summary statistics
//! for a single column. Request-scoped: nothing here outlives the call.

use crate::data::{Table, Value};
use crate::{Error, Result};
use serde::Serialize;

/// Numeric summary over the coercible subset of a column.
///
/// Serializes as `{"mean": null}` when no value is numerically coercible,
/// and as `{"mean": .., "min": .., "max": ..}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericStats {
    /// Stats for a column with no numerically coercible values
    pub fn empty() -> Self {
        Self {
            mean: None,
            min: None,
            max: None,
        }
    }

    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        let sum: f64 = values.iter().sum();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean: Some(sum / values.len() as f64),
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Request-scoped summary of a single column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Cleaned value sequence, row-aligned, missing cells as explicit nulls
    pub values: Vec<Value>,
    /// Count of distinct non-missing values
    pub unique_count: usize,
    /// Count of missing cells
    pub missing_count: usize,
    /// Numeric statistics over the coercible subset
    pub stats: NumericStats,
}

/// Summarize one column of a table.
///
/// Fails only when the column is absent; unparseable cells, missing
/// values, and empty columns are absorbed into the result shape.
pub fn summarize(table: &Table, column_name: &str) -> Result<ColumnSummary> {
    let col = table
        .column(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))?;

    let values: Vec<Value> = col
        .iter()
        .map(|v| if v.is_missing() { Value::Null } else { v.clone() })
        .collect();

    let missing_count = col.count_missing();
    let unique_count = col.count_distinct();

    // Best-effort coercion: non-numeric cells drop out, they never abort
    let numeric: Vec<f64> = col.iter().filter_map(Value::coerce_f64).collect();
    let stats = NumericStats::from_values(&numeric);

    Ok(ColumnSummary {
        values,
        unique_count,
        missing_count,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, DataType};

    fn single_column_table(dtype: DataType, values: Vec<Value>) -> Table {
        Table::from_columns(vec![Column::from_values("c", dtype, values)]).unwrap()
    }

    #[test]
    fn test_column_not_found() {
        let table = single_column_table(DataType::Int64, vec![Value::Int64(1)]);
        let err = summarize(&table, "missing").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_categorical_with_nulls() {
        let table = single_column_table(
            DataType::String,
            vec![
                Value::String("a".into()),
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("b".into()),
                Value::Null,
                Value::Null,
            ],
        );
        let summary = summarize(&table, "c").unwrap();
        assert_eq!(summary.missing_count, 2);
        assert_eq!(summary.unique_count, 2);
        assert_eq!(summary.values.len(), 6);
        assert_eq!(summary.values[4], Value::Null);
        assert_eq!(summary.stats, NumericStats::empty());
    }

    #[test]
    fn test_mixed_numeric_stats() {
        let table = single_column_table(
            DataType::Mixed,
            vec![
                Value::Int64(1),
                Value::Int64(2),
                Value::String("x".into()),
                Value::Int64(4),
                Value::Null,
            ],
        );
        let summary = summarize(&table, "c").unwrap();
        // Only the explicit null counts as missing; "x" stays in values
        assert_eq!(summary.missing_count, 1);
        assert_eq!(summary.values[2], Value::String("x".into()));
        assert!((summary.stats.mean.unwrap() - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.stats.min, Some(1.0));
        assert_eq!(summary.stats.max, Some(4.0));
    }

    #[test]
    fn test_empty_column() {
        let table = single_column_table(DataType::String, vec![]);
        let summary = summarize(&table, "c").unwrap();
        assert!(summary.values.is_empty());
        assert_eq!(summary.missing_count, 0);
        assert_eq!(summary.unique_count, 0);
        assert_eq!(summary.stats, NumericStats::empty());
    }

    #[test]
    fn test_numeric_looking_strings_contribute() {
        let table = single_column_table(
            DataType::String,
            vec![
                Value::String("10".into()),
                Value::String("20".into()),
                Value::String("thirty".into()),
            ],
        );
        let summary = summarize(&table, "c").unwrap();
        assert_eq!(summary.stats.mean, Some(15.0));
        assert_eq!(summary.stats.min, Some(10.0));
        assert_eq!(summary.stats.max, Some(20.0));
    }

    #[test]
    fn test_nan_normalized_to_null() {
        let table = single_column_table(
            DataType::Float64,
            vec![Value::Float64(1.0), Value::Float64(f64::NAN)],
        );
        let summary = summarize(&table, "c").unwrap();
        assert_eq!(summary.values[1], Value::Null);
        assert_eq!(summary.missing_count, 1);
        assert_eq!(summary.stats.mean, Some(1.0));
    }

    #[test]
    fn test_missing_plus_non_null_equals_row_count() {
        let table = single_column_table(
            DataType::Mixed,
            vec![
                Value::Int64(5),
                Value::Null,
                Value::String("a".into()),
                Value::Float64(f64::NAN),
                Value::Bool(true),
            ],
        );
        let summary = summarize(&table, "c").unwrap();
        let non_null = summary.values.iter().filter(|v| !v.is_null()).count();
        assert_eq!(summary.missing_count + non_null, table.row_count());
    }

    #[test]
    fn test_stats_json_shape() {
        let empty = serde_json::to_string(&NumericStats::empty()).unwrap();
        assert_eq!(empty, r#"{"mean":null}"#);

        let full = serde_json::to_string(&NumericStats::from_values(&[1.0, 2.0, 4.0])).unwrap();
        assert_eq!(
            full,
            r#"{"mean":2.3333333333333335,"min":1.0,"max":4.0}"#
        );
    }
}
