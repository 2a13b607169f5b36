//! Serialized execution of ledger operations.
//!
//! `LedgerService` keeps the authoritative copy of the document in memory
//! behind a single mutex and persists it after every committed mutation:
//!
//! ```text
//! request
//!   ↓
//! 1. Take the write guard
//!   ↓
//! 2. Clone the document (draft)
//!   ↓
//! 3. Run the ledger operation against the draft
//!   ↓
//! 4. Save the draft (stamps lastUpdated)
//!   ↓
//! 5. Swap the draft in as the new authoritative copy
//! ```
//!
//! A failed operation or a failed save drops the draft, so the in-memory copy
//! and the file never disagree. Holding the guard across the save means two
//! requests can never interleave their load and save phases.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use serde_json::Value as JsonValue;

use shopledger_core::{Entity, IdGenerator, ItemId, LedgerResult, SaleId};
use shopledger_inventory::{InventoryItem, ItemPatch, NewItem};
use shopledger_ledger::{operations, Document, ItemRemoval, SaleRemoval};
use shopledger_sales::{RecordSale, SaleRecord};

use crate::store::{DocumentStore, StoreError};

#[derive(Debug)]
struct LedgerState {
    document: Document,
    ids: IdGenerator,
}

impl LedgerState {
    fn new(document: Document) -> Self {
        let mut ids = IdGenerator::new();
        ids.observe(document.max_raw_id());
        Self { document, ids }
    }
}

#[derive(Debug)]
pub struct LedgerService<S> {
    store: S,
    state: Mutex<LedgerState>,
}

impl<S> LedgerService<S>
where
    S: DocumentStore,
{
    /// Load the stored document (fail-open) and start serving it.
    ///
    /// Also returns the read error, if any, so the caller can report that it
    /// started from an empty document.
    pub fn open(store: S) -> (Self, Option<StoreError>) {
        let loaded = store.load();
        tracing::info!(
            items = loaded.document.inventory.len(),
            sales = loaded.document.sales.len(),
            degraded = loaded.degraded.is_some(),
            "ledger loaded"
        );
        let service = Self {
            store,
            state: Mutex::new(LedgerState::new(loaded.document)),
        };
        (service, loaded.degraded)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> Document {
        self.lock().document.clone()
    }

    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.lock().document.inventory.clone()
    }

    pub fn sales(&self) -> Vec<SaleRecord> {
        self.lock().document.sales.clone()
    }

    pub fn add_item(&self, request: NewItem) -> LedgerResult<InventoryItem> {
        let item = self.commit(|doc, ids| {
            let id = ids.next_item_id()?;
            operations::add_item(doc, id, request, today())
        })?;
        tracing::info!(item_id = %item.id(), name = item.name(), quantity = item.quantity(), "item added");
        Ok(item)
    }

    pub fn update_item(&self, id: ItemId, patch: ItemPatch) -> LedgerResult<InventoryItem> {
        let item = self.commit(|doc, _| operations::update_item(doc, id, patch))?;
        tracing::info!(item_id = %id, quantity = item.quantity(), "item updated");
        Ok(item)
    }

    pub fn delete_item(&self, id: ItemId) -> LedgerResult<ItemRemoval> {
        let removal = self.commit(|doc, _| operations::delete_item(doc, id))?;
        if removal.orphaned_sales > 0 {
            tracing::warn!(
                item_id = %id,
                orphaned_sales = removal.orphaned_sales,
                "item deleted; sales still reference it"
            );
        } else {
            tracing::info!(item_id = %id, "item deleted");
        }
        Ok(removal)
    }

    pub fn record_sale(&self, request: RecordSale) -> LedgerResult<SaleRecord> {
        let sale = self.commit(|doc, ids| {
            let id = ids.next_sale_id()?;
            operations::record_sale(doc, id, &request, today())
        })?;
        tracing::info!(
            item_id = %request.item_id,
            quantity = request.quantity,
            total_amount = sale.total_amount(),
            "sale recorded"
        );
        Ok(sale)
    }

    pub fn delete_sale(&self, id: SaleId) -> LedgerResult<SaleRemoval> {
        let removal = self.commit(|doc, _| operations::delete_sale(doc, id))?;
        tracing::info!(
            sale_id = %id,
            stock_restored = removal.stock_restored,
            "sale deleted"
        );
        Ok(removal)
    }

    /// Replace the whole document with an uploaded backup.
    pub fn restore(&self, payload: JsonValue) -> LedgerResult<()> {
        let replacement = Document::from_backup(payload)?;
        let (items, sales) = (replacement.inventory.len(), replacement.sales.len());
        self.commit(|doc, ids| {
            ids.observe(replacement.max_raw_id());
            operations::restore(doc, replacement);
            Ok(())
        })?;
        tracing::info!(items, sales, "ledger restored from backup");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // State is only ever replaced wholesale after a successful save, so a
        // poisoned guard still holds a consistent document.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit<T>(
        &self,
        op: impl FnOnce(&mut Document, &mut IdGenerator) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut state = self.lock();
        let mut draft = state.document.clone();
        let mut ids = state.ids.clone();

        let out = op(&mut draft, &mut ids)?;

        if let Err(e) = self.store.save(&mut draft) {
            tracing::error!(error = %e, "persisting ledger document failed");
            return Err(e.into());
        }

        state.document = draft;
        state.ids = ids;
        Ok(out)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
