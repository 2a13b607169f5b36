use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use shopledger_core::LedgerError;
use shopledger_ledger::Document;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode document: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        LedgerError::storage(value.to_string())
    }
}

/// Result of a fail-open load.
#[derive(Debug)]
pub struct Loaded {
    pub document: Document,
    /// Set when the stored document could not be read and an empty one was
    /// substituted.
    pub degraded: Option<StoreError>,
}

/// Whole-document persistence.
///
/// Implementors provide `read` and `write`; `load` and `save` add the
/// fail-open and timestamping behaviour on top.
pub trait DocumentStore: Send + Sync {
    /// Read and decode the stored document.
    fn read(&self) -> Result<Document, StoreError>;

    /// Overwrite the stored document with `doc`, as is.
    fn write(&self, doc: &Document) -> Result<(), StoreError>;

    /// Read the stored document, falling back to an empty one on failure.
    ///
    /// Never fails: the error is logged and handed back in
    /// [`Loaded::degraded`] for the caller to surface.
    fn load(&self) -> Loaded {
        match self.read() {
            Ok(document) => Loaded {
                document,
                degraded: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "reading ledger document failed; starting from an empty document");
                Loaded {
                    document: Document::default(),
                    degraded: Some(e),
                }
            }
        }
    }

    /// Stamp `lastUpdated` with the current time, then overwrite the stored document.
    fn save(&self, doc: &mut Document) -> Result<(), StoreError> {
        doc.last_updated = Utc::now();
        self.write(doc)
    }
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn read(&self) -> Result<Document, StoreError> {
        (**self).read()
    }

    fn write(&self, doc: &Document) -> Result<(), StoreError> {
        (**self).write(doc)
    }
}
