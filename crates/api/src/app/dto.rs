use chrono::{DateTime, Utc};
use serde::Serialize;

use shopledger_inventory::InventoryItem;
use shopledger_sales::SaleRecord;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: InventoryItem,
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub success: bool,
    pub sale: SaleRecord,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl ItemResponse {
    pub fn ok(item: InventoryItem) -> Self {
        Self {
            success: true,
            item,
        }
    }
}

impl SaleResponse {
    pub fn ok(sale: SaleRecord) -> Self {
        Self {
            success: true,
            sale,
        }
    }
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

// -------------------------
// Backup naming
// -------------------------

/// `backup-YYYY-MM-DD-<unix millis>.json`
pub fn backup_filename(now: DateTime<Utc>) -> String {
    format!(
        "backup-{}-{}.json",
        now.format("%Y-%m-%d"),
        now.timestamp_millis()
    )
}
