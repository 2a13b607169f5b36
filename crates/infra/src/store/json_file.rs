use std::fs;
use std::path::{Path, PathBuf};

use shopledger_ledger::Document;

use super::r#trait::{DocumentStore, StoreError};

/// Pretty-printed JSON file holding the whole ledger document.
///
/// Writes go to a sibling `*.tmp` file which is then renamed over the
/// target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty document if it does not exist yet.
    ///
    /// Returns `true` when a new file was written.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.save(&mut Document::default())?;
        tracing::info!(path = %self.path.display(), "created initial ledger document");
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self) -> Result<Document, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(StoreError::Decode)
    }

    fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc).map_err(StoreError::Encode)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            items = doc.inventory.len(),
            sales = doc.sales.len(),
            "ledger document written"
        );
        Ok(())
    }
}
