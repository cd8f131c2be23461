//! Dataset catalog: upload storage and per-column data requests
//!
//! CRUD plumbing around the core. Uploaded files are kept on disk under
//! a per-owner directory; metadata (row/column counts plus the column
//! type map) is computed once at ingest and persisted in a JSON registry.
//! Column data requests reload the backing table fresh from storage, so
//! no table state is shared across requests.

use crate::classify::SemanticType;
use crate::ingest::{ingest_table, read_csv, read_csv_headers, read_csv_path, DatasetMeta, IngestResult};
use crate::summarize::{summarize, ColumnSummary};
use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const REGISTRY_FILE: &str = "catalog.json";

/// A stored dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: u64,
    pub owner: String,
    /// Original filename as uploaded
    pub name: String,
    /// Location of the raw file on disk
    pub path: PathBuf,
    /// Raw file size in bytes
    pub size: u64,
    pub uploaded_at: String,
    pub meta: DatasetMeta,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogState {
    next_id: u64,
    datasets: HashMap<u64, DatasetRecord>,
}

/// Registry of uploaded datasets
pub struct DatasetCatalog {
    data_dir: PathBuf,
    state: RwLock<CatalogState>,
}

impl DatasetCatalog {
    /// Open (or create) a catalog rooted at `data_dir`
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let registry = data_dir.join(REGISTRY_FILE);
        let state = if registry.exists() {
            let file = std::fs::File::open(&registry)?;
            serde_json::from_reader(file).map_err(|e| Error::SerializationError(e.to_string()))?
        } else {
            CatalogState {
                next_id: 1,
                datasets: HashMap::new(),
            }
        };

        Ok(Self {
            data_dir,
            state: RwLock::new(state),
        })
    }

    /// Ingest an uploaded file: parse, classify once, store file and record.
    ///
    /// The returned result carries the persisted metadata, the column list,
    /// and the preview rows for the uploader.
    pub fn ingest(&self, owner: &str, filename: &str, bytes: &[u8]) -> Result<(u64, IngestResult)> {
        let table = read_csv(bytes)?;
        let result = ingest_table(&table);

        let owner_dir = self.data_dir.join(owner);
        std::fs::create_dir_all(&owner_dir)?;

        let (id, record) = {
            let mut state = self.state.write();
            let id = state.next_id;
            state.next_id += 1;

            let path = owner_dir.join(format!("{}_{}", id, filename));
            std::fs::write(&path, bytes)?;

            let record = DatasetRecord {
                id,
                owner: owner.to_string(),
                name: filename.to_string(),
                path,
                size: bytes.len() as u64,
                uploaded_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                meta: result.meta.clone(),
            };
            state.datasets.insert(id, record.clone());
            (id, record)
        };
        self.persist()?;

        log::info!(
            "ingested dataset {} '{}' for {}: {} rows, {} columns",
            id,
            record.name,
            owner,
            record.meta.row_count,
            record.meta.column_count
        );
        Ok((id, result))
    }

    /// Fetch a dataset record, enforcing ownership. A dataset owned by
    /// someone else is indistinguishable from one that does not exist.
    pub fn get(&self, id: u64, owner: &str) -> Result<DatasetRecord> {
        let state = self.state.read();
        state
            .datasets
            .get(&id)
            .filter(|r| r.owner == owner)
            .cloned()
            .ok_or(Error::DatasetNotFound(id))
    }

    /// Summarize one column of a stored dataset.
    ///
    /// Reloads the table fresh from storage on every call.
    pub fn column_data(&self, id: u64, owner: &str, column: &str) -> Result<ColumnSummary> {
        let record = self.get(id, owner)?;
        let table = read_csv_path(&record.path)?;
        summarize(&table, column)
    }

    /// Column names plus the persisted type map, loading only the header row
    pub fn columns(&self, id: u64, owner: &str) -> Result<(Vec<String>, HashMap<String, SemanticType>)> {
        let record = self.get(id, owner)?;
        let headers = read_csv_headers(&record.path)?;
        Ok((headers, record.meta.column_types))
    }

    /// All datasets belonging to `owner`, newest first
    pub fn list(&self, owner: &str) -> Vec<DatasetRecord> {
        let state = self.state.read();
        let mut records: Vec<DatasetRecord> = state
            .datasets
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }

    /// Delete a dataset: record and stored file
    pub fn remove(&self, id: u64, owner: &str) -> Result<()> {
        let record = {
            let mut state = self.state.write();
            let owned = matches!(state.datasets.get(&id), Some(r) if r.owner == owner);
            if !owned {
                return Err(Error::DatasetNotFound(id));
            }
            state.datasets.remove(&id).ok_or(Error::DatasetNotFound(id))?
        };
        if record.path.exists() {
            std::fs::remove_file(&record.path)?;
        }
        self.persist()?;
        log::info!("removed dataset {} '{}' for {}", id, record.name, owner);
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn persist(&self) -> Result<()> {
        let json = {
            let state = self.state.read();
            serde_json::to_string_pretty(&*state)
                .map_err(|e| Error::SerializationError(e.to_string()))?
        };
        std::fs::write(self.data_dir.join(REGISTRY_FILE), json)?;
        Ok(())
    }
}
