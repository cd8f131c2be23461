//! Table: an ordered sequence of named columns with a uniform row count
//!
//! Tables are transient; whichever component loads one from storage owns
//! it for the duration of a single request and never mutates it.

use super::Column;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, validating uniform row counts and unique column names
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let rows = first.len();
            for col in &columns {
                if col.len() != rows {
                    return Err(Error::MalformedTable(format!(
                        "column '{}' has {} rows, expected {}",
                        col.name(),
                        col.len(),
                        rows
                    )));
                }
            }
        }
        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(Error::MalformedTable(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows (uniform across columns)
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Iterate over columns in table order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
