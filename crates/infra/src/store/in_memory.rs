use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use shopledger_ledger::Document;

use super::r#trait::{DocumentStore, StoreError};

/// In-memory document store.
///
/// Intended for tests/dev. Reads and writes can be switched to fail to
/// exercise the degraded paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    document: RwLock<Document>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the currently stored document.
    pub fn stored(&self) -> Document {
        self.document
            .read()
            .map(|d| d.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self) -> Result<Document, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.stored())
    }

    fn write(&self, doc: &Document) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let mut guard = self
            .document
            .write()
            .map_err(|_| StoreError::Unavailable("document lock poisoned".to_string()))?;
        *guard = doc.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
