//! Dynamic value model for heterogeneous tabular data
//!
//! Cells are tagged variants so a single column can carry mixed runtime
//! types. Missing data is a first-class `Value::Null`, distinct from zero
//! and from the empty string.

mod column;
mod table;

pub use column::Column;
pub use table::Table;

use serde::ser::{Serialize, Serializer};

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    Int64,
    Float64,
    Bool,
    String,
    /// Epoch-microsecond timestamps
    Timestamp,
    /// Heterogeneous runtime types in one column
    Mixed,
}

impl DataType {
    /// Whether this storage type is a numeric kind
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    String(String),
    /// Epoch microseconds (UTC)
    Timestamp(i64),
}

impl Value {
    /// Check whether this cell counts as missing.
    /// Non-finite floats are the NaN-as-missing convention made explicit.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(f) => !f.is_finite(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Storage type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Mixed,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Bool(_) => DataType::Bool,
            Value::String(_) => DataType::String,
            Value::Timestamp(_) => DataType::Timestamp,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(i) => Some(*i as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Best-effort numeric coercion. A failed coercion is an explicit
    /// `None`, never an error: non-numeric text and timestamps simply
    /// drop out of numeric statistics.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(i) => Some(*i as f64),
            Value::Float64(f) => f.is_finite().then_some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Value::Null | Value::Timestamp(_) => None,
        }
    }

    /// String rendering used for previews and text output
    pub fn to_string_value(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int64(i) => i.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Timestamp(t) => format_timestamp(*t),
        }
    }
}

/// Render epoch microseconds as "YYYY-MM-DD HH:MM:SS"
pub(crate) fn format_timestamp(micros: i64) -> String {
    match chrono::DateTime::from_timestamp_micros(micros) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => micros.to_string(),
    }
}

// JSON-safe serialization: numbers stay numbers, text stays text,
// timestamps render as datetime strings, missing cells become null.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Float64(f) => {
                if f.is_finite() {
                    serializer.serialize_f64(*f)
                } else {
                    serializer.serialize_none()
                }
            }
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => serializer.serialize_str(&format_timestamp(*t)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
