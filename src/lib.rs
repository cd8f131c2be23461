//! ChartBase Column Analysis Engine
//!
//! Classifies tabular columns into semantic types (numeric, datetime,
//! categorical, text) and produces chart-ready per-column summaries.
//! The catalog layer stores uploaded datasets and serves column data
//! requests on demand.

pub mod data;
pub mod classify;
pub mod summarize;
pub mod ingest;
pub mod catalog;

// Re-export main types
pub use data::{Column, DataType, Table, Value};
pub use classify::{classify, SemanticType};
pub use summarize::{summarize, ColumnSummary, NumericStats};
pub use ingest::{DatasetMeta, IngestResult};
pub use catalog::DatasetCatalog;

/// Engine error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(u64),

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
