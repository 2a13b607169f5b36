//! Infrastructure layer: document storage and serialized ledger execution.

pub mod ledger_service;
pub mod store;

mod integration_tests;

pub use ledger_service::LedgerService;
pub use store::{DocumentStore, InMemoryStore, JsonFileStore, Loaded, StoreError};
