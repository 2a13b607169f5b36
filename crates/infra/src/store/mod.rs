//! Durable storage for the ledger document.
//!
//! The store owns exactly one document and only ever reads or overwrites it
//! whole. There is no partial/patch persistence.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use r#trait::{DocumentStore, Loaded, StoreError};
