//! Ingest: CSV parsing and storage-type inference
//!
//! Parses an uploaded file into a [`Table`], infers each column's storage
//! type from its cells, runs the classifier once, and assembles the ingest
//! result (counts, type map, preview) surfaced to the caller.

use crate::classify::{classify, SemanticType};
use crate::data::{Column, DataType, Table, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Rows included in the upload preview
pub const PREVIEW_ROWS: usize = 15;

/// Cell spellings treated as missing
const NA_TOKENS: &[&str] = &["", "NaN", "nan", "NA", "N/A", "null", "NULL"];

/// Persisted dataset metadata, computed once at ingest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub row_count: usize,
    pub column_count: usize,
    pub column_types: HashMap<String, SemanticType>,
}

/// Result of ingesting a table, returned to the uploader
#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub meta: DatasetMeta,
    /// Column names in table order
    pub columns: Vec<String>,
    /// First rows as JSON objects, missing cells as empty strings
    pub preview: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Parse CSV data into a table.
///
/// The first record is the header; ragged records are a malformed table.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| Error::MalformedTable(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(Error::MalformedTable("no columns".to_string()));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record.map_err(|e| Error::MalformedTable(e.to_string()))?;
        if record.len() != headers.len() {
            return Err(Error::MalformedTable(format!(
                "record has {} fields, expected {}",
                record.len(),
                headers.len()
            )));
        }
        for (i, field) in record.iter().enumerate() {
            if NA_TOKENS.contains(&field) {
                cells[i].push(None);
            } else {
                cells[i].push(Some(field.to_string()));
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| build_column(name, raw))
        .collect();
    Table::from_columns(columns)
}

/// Parse a CSV file from disk
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Table> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Read only the header row of a CSV file
pub fn read_csv_headers(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let headers = rdr
        .headers()
        .map_err(|e| Error::MalformedTable(e.to_string()))?;
    Ok(headers.iter().map(|h| h.to_string()).collect())
}

/// Infer a column's storage type and build its typed values.
///
/// Inference order matches the narrowest-first convention: integers
/// before floats before bools, with raw text as the fallback. A column
/// whose rows are all missing is an all-NaN float column; a zero-row
/// column stays generic.
fn build_column(name: String, raw: Vec<Option<String>>) -> Column {
    let non_missing: Vec<&str> = raw.iter().flatten().map(|s| s.as_str()).collect();

    let dtype = if raw.is_empty() {
        DataType::String
    } else if non_missing.is_empty() {
        DataType::Float64
    } else if non_missing.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
        DataType::Int64
    } else if non_missing.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        DataType::Float64
    } else if non_missing.iter().all(|s| parse_bool(s).is_some()) {
        DataType::Bool
    } else {
        DataType::String
    };

    let values = raw
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) => match dtype {
                DataType::Int64 => Value::Int64(s.trim().parse().unwrap_or_default()),
                DataType::Float64 => Value::Float64(s.trim().parse().unwrap_or(f64::NAN)),
                DataType::Bool => Value::Bool(parse_bool(&s).unwrap_or_default()),
                _ => Value::String(s),
            },
        })
        .collect();

    Column::from_values(name, dtype, values)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Classify a freshly parsed table and assemble the ingest result
pub fn ingest_table(table: &Table) -> IngestResult {
    let column_types = classify(table);
    let meta = DatasetMeta {
        row_count: table.row_count(),
        column_count: table.column_count(),
        column_types,
    };
    IngestResult {
        columns: table.column_names(),
        preview: preview_rows(table, PREVIEW_ROWS),
        meta,
    }
}

/// First `limit` rows as JSON objects with missing cells blanked out
fn preview_rows(table: &Table, limit: usize) -> Vec<serde_json::Map<String, serde_json::Value>> {
    let rows = table.row_count().min(limit);
    (0..rows)
        .map(|i| {
            table
                .columns()
                .map(|col| {
                    let cell = match col.get(i) {
                        Some(v) if !v.is_missing() => {
                            serde_json::to_value(v).unwrap_or(serde_json::Value::Null)
                        }
                        _ => serde_json::Value::String(String::new()),
                    };
                    (col.name().to_string(), cell)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,score,label,joined
1,3.5,red,2021-01-01
2,4.0,blue,2021-02-01
3,NaN,red,2021-03-01
";

    #[test]
    fn test_read_csv_types() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.column("id").unwrap().data_type(), DataType::Int64);
        assert_eq!(table.column("score").unwrap().data_type(), DataType::Float64);
        assert_eq!(table.column("label").unwrap().data_type(), DataType::String);
        assert_eq!(table.column("score").unwrap().get(2), Some(&Value::Null));
    }

    #[test]
    fn test_classification_of_parsed_csv() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let result = ingest_table(&table);
        assert_eq!(result.meta.column_types["id"], SemanticType::Numeric);
        assert_eq!(result.meta.column_types["score"], SemanticType::Numeric);
        assert_eq!(result.meta.column_types["label"], SemanticType::Categorical);
        assert_eq!(result.meta.column_types["joined"], SemanticType::Datetime);
    }

    #[test]
    fn test_ragged_record_is_malformed() {
        let err = read_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedTable(_)));
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let table = read_csv("a,b\n1,\n2,NA\n".as_bytes()).unwrap();
        let col = table.column("b").unwrap();
        assert_eq!(col.data_type(), DataType::Float64);
        assert_eq!(col.count_missing(), 2);
        assert_eq!(
            classify(&table)["b"],
            SemanticType::Numeric
        );
    }

    #[test]
    fn test_bool_column() {
        let table = read_csv("flag\ntrue\nFalse\n".as_bytes()).unwrap();
        assert_eq!(table.column("flag").unwrap().data_type(), DataType::Bool);
        assert_eq!(classify(&table)["flag"], SemanticType::Text);
    }

    #[test]
    fn test_preview_blanks_missing_cells() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let result = ingest_table(&table);
        assert_eq!(result.preview.len(), 3);
        assert_eq!(result.preview[0]["id"], serde_json::json!(1));
        assert_eq!(result.preview[2]["score"], serde_json::json!(""));
        assert_eq!(result.preview[0]["label"], serde_json::json!("red"));
    }

    #[test]
    fn test_preview_is_capped() {
        let mut csv = String::from("n\n");
        for i in 0..40 {
            csv.push_str(&format!("{}\n", i));
        }
        let table = read_csv(csv.as_bytes()).unwrap();
        let result = ingest_table(&table);
        assert_eq!(result.preview.len(), PREVIEW_ROWS);
        assert_eq!(result.meta.row_count, 40);
    }

    #[test]
    fn test_meta_json_shape() {
        let table = read_csv("a\nx\n".as_bytes()).unwrap();
        let meta = ingest_table(&table).meta;
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["row_count"], 1);
        assert_eq!(json["column_count"], 1);
        assert_eq!(json["column_types"]["a"], "categorical");

        let parsed: DatasetMeta = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.column_types["a"], SemanticType::Categorical);
    }

    #[test]
    fn test_headers_only_file() {
        let table = read_csv("a,b\n".as_bytes()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
        // Zero-row generic columns pass the datetime parse vacuously
        assert_eq!(classify(&table)["a"], SemanticType::Datetime);
    }
}
