//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant maps to exactly one HTTP status at the API boundary:
/// validation and business-rule failures are the caller's fault, `NotFound`
/// names the missing record, and `Storage` covers durable write failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A request payload failed validation (malformed or incomplete).
    #[error("{0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced record does not exist. Carries the full message.
    #[error("{0}")]
    NotFound(String),

    /// A sale asked for more stock than the item currently holds.
    #[error("Insufficient stock")]
    InsufficientStock { requested: i64, available: i64 },

    /// Persisting the document failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(subject: &str) -> Self {
        Self::NotFound(format!("{subject} not found"))
    }

    /// A sale named an item the inventory does not hold.
    pub fn not_in_inventory() -> Self {
        Self::NotFound("Item not found in inventory".to_string())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
