use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataError;
use super::loader::{load_file, DataSource};
use super::model::IncidentDataset;

/// Identity of a loaded source: where it lives, which sheet, and when the
/// file was last modified. Editing the file yields a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub sheet: String,
    pub modified: Option<SystemTime>,
}

impl SourceKey {
    /// Compute the key for a source. Fails with `DataError::Load` when the
    /// file cannot be found.
    pub fn for_source(source: &DataSource) -> Result<Self, DataError> {
        let metadata = std::fs::metadata(&source.path).map_err(|e| DataError::Load {
            path: source.path.clone(),
            source: e,
        })?;
        let path = source
            .path
            .canonicalize()
            .unwrap_or_else(|_| source.path.clone());
        Ok(SourceKey {
            path,
            sheet: source.sheet.clone(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Normalized datasets for the lifetime of the process.
///
/// Each key is loaded at most once; entries live until `invalidate` or
/// `clear`. There is one owner and no eviction.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<IncidentDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `source`, loading it on first access.
    pub fn get_or_load(&mut self, source: &DataSource) -> Result<Arc<IncidentDataset>, DataError> {
        let key = SourceKey::for_source(source)?;
        if let Some(dataset) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", key.path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(source)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn get(&self, key: &SourceKey) -> Option<Arc<IncidentDataset>> {
        self.entries.get(key).cloned()
    }

    /// Populate an entry directly, replacing any previous one.
    pub fn insert(&mut self, key: SourceKey, dataset: IncidentDataset) -> Arc<IncidentDataset> {
        let dataset = Arc::new(dataset);
        self.entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &SourceKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
