//! Column storage: an ordered sequence of dynamically typed cells

use super::{DataType, Value};
use ahash::AHashSet;

/// A named column of values
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name (unique within a table)
    name: String,
    /// Storage type, fixed at construction
    dtype: DataType,
    /// Cell values in row order
    values: Vec<Value>,
}

impl Column {
    /// Create an empty column
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
            values: Vec::new(),
        }
    }

    /// Create a column from existing values
    pub fn from_values(name: impl Into<String>, dtype: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Iterate over values in row order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Count missing (null or NaN-equivalent) cells
    pub fn count_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Iterate over non-missing values
    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }

    /// Count distinct non-missing values
    pub fn count_distinct(&self) -> usize {
        let mut seen = AHashSet::new();
        for v in self.non_missing() {
            seen.insert(format!("{:?}", v));
        }
        seen.len()
    }
}
