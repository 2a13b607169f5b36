use std::sync::Arc;

use shopledger_core::{LedgerError, LedgerResult};
use shopledger_infra::{DocumentStore, JsonFileStore, LedgerService, StoreError};

use crate::config::ServerConfig;

/// Store handle shared by the ledger service (file-backed in production).
pub type SharedStore = Arc<dyn DocumentStore>;

/// Everything the handlers need.
pub type AppServices = LedgerService<SharedStore>;

/// Open the ledger document configured in `config`, creating it if absent.
///
/// An unreadable existing document does not abort startup: the service
/// starts from an empty document and the problem is logged.
pub fn build_services(config: &ServerConfig) -> Result<AppServices, StoreError> {
    let store = JsonFileStore::new(config.data_file.clone());
    store.initialize()?;

    Ok(open_with_store(Arc::new(store)))
}

/// Wire a ledger service over any store (tests use the in-memory one).
pub fn open_with_store(store: SharedStore) -> AppServices {
    let (services, degraded) = LedgerService::open(store);
    if let Some(e) = degraded {
        tracing::error!(error = %e, "stored ledger document is unreadable; serving an empty document until the next write");
    }
    services
}

/// Run a ledger call on the blocking pool.
///
/// Every call may wait on the ledger lock, and mutations write the document
/// file while holding it, so none of them run on an async worker thread. A
/// task that panics or is cancelled surfaces as a storage failure.
pub async fn run_blocking<T, F>(services: Arc<AppServices>, op: F) -> LedgerResult<T>
where
    F: FnOnce(&AppServices) -> LedgerResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(move || op(&services)).await {
        Ok(result) => result,
        Err(e) => Err(LedgerError::storage(format!("ledger task failed: {e}"))),
    }
}
