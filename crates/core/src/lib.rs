//! `shopledger-core` — shared building blocks for the ledger crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;

pub use amount::Amount;
pub use entity::{position_of, Entity};
pub use error::{LedgerError, LedgerResult};
pub use id::{IdGenerator, ItemId, SaleId};
