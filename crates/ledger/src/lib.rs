//! The ledger document and the operations that keep it consistent.
//!
//! Stock quantities, sale records and their totals live in one [`Document`].
//! Every operation in [`operations`] takes the document by `&mut`, checks its
//! preconditions first and only then mutates, so an `Err` always means the
//! document was left exactly as it was.

pub mod document;
pub mod operations;

pub use document::Document;
pub use operations::{
    add_item, delete_item, delete_sale, record_sale, restore, update_item, ItemRemoval,
    SaleRemoval,
};
