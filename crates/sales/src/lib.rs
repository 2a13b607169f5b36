//! Sales domain module.
//!
//! A sale is an immutable snapshot of what was sold, to whom and at what
//! margin. It copies the item's name, cost price and warehouse at the time of
//! sale and never follows later edits to the item.

pub mod sale;

pub use sale::{RecordSale, SaleRecord};
