//! Ledger operations: add/update/delete items, record/delete sales, restore.
//!
//! Identifiers and "today" are passed in rather than read from the clock so
//! every operation is deterministic under test.

use chrono::NaiveDate;

use shopledger_core::{position_of, ItemId, LedgerError, LedgerResult, SaleId};
use shopledger_inventory::{InventoryItem, ItemPatch, NewItem};
use shopledger_sales::{RecordSale, SaleRecord};

use crate::document::Document;

/// Outcome of deleting an inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRemoval {
    pub item: InventoryItem,
    /// Sales that still reference the deleted item.
    pub orphaned_sales: usize,
}

/// Outcome of deleting a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRemoval {
    pub sale: SaleRecord,
    /// `false` when the sold item no longer exists.
    pub stock_restored: bool,
}

pub fn add_item(
    doc: &mut Document,
    id: ItemId,
    request: NewItem,
    today: NaiveDate,
) -> LedgerResult<InventoryItem> {
    let item = InventoryItem::create(id, request, today)?;
    doc.inventory.push(item.clone());
    Ok(item)
}

pub fn update_item(doc: &mut Document, id: ItemId, patch: ItemPatch) -> LedgerResult<InventoryItem> {
    let idx = position_of(&doc.inventory, id).ok_or_else(|| LedgerError::not_found("Item"))?;
    let item = &mut doc.inventory[idx];
    item.apply_patch(patch)?;
    Ok(item.clone())
}

/// Remove an item. Sales that reference it are kept as-is.
pub fn delete_item(doc: &mut Document, id: ItemId) -> LedgerResult<ItemRemoval> {
    let idx = position_of(&doc.inventory, id).ok_or_else(|| LedgerError::not_found("Item"))?;
    let item = doc.inventory.remove(idx);
    let orphaned_sales = doc.sales.iter().filter(|s| s.item_id() == Some(id)).count();
    Ok(ItemRemoval {
        item,
        orphaned_sales,
    })
}

/// Sell from stock: withdraw the quantity and append the sale snapshot.
pub fn record_sale(
    doc: &mut Document,
    id: SaleId,
    request: &RecordSale,
    today: NaiveDate,
) -> LedgerResult<SaleRecord> {
    request.validate()?;

    let idx = position_of(&doc.inventory, request.item_id)
        .ok_or_else(LedgerError::not_in_inventory)?;
    let item = &mut doc.inventory[idx];

    // Snapshot before withdrawing: the sale copies the item as it was sold.
    let sale = SaleRecord::snapshot(id, item, request, today);
    item.withdraw(request.quantity)?;

    doc.sales.push(sale.clone());
    Ok(sale)
}

/// Remove a sale, putting its quantity back on the shelf if the item still exists.
pub fn delete_sale(doc: &mut Document, id: SaleId) -> LedgerResult<SaleRemoval> {
    let idx = position_of(&doc.sales, id).ok_or_else(|| LedgerError::not_found("Sale"))?;
    let sale = doc.sales.remove(idx);

    let item_idx = sale
        .item_id()
        .and_then(|item_id| position_of(&doc.inventory, item_id));
    let stock_restored = match item_idx {
        Some(item_idx) => {
            doc.inventory[item_idx].restock(sale.quantity());
            true
        }
        None => false,
    };

    Ok(SaleRemoval {
        sale,
        stock_restored,
    })
}

/// Replace the whole document.
pub fn restore(doc: &mut Document, replacement: Document) {
    *doc = replacement;
}
