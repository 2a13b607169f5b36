//! Inventory domain module.
//!
//! This crate contains the stock-keeping record and the business rules for
//! creating and editing it, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod item;

pub use item::{InventoryItem, ItemPatch, NewItem};
