use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopledger_core::{Entity, LedgerError, LedgerResult};
use shopledger_inventory::InventoryItem;
use shopledger_sales::SaleRecord;

const INVALID_BACKUP: &str = "Invalid backup data format";

/// The complete persisted state: inventory, sales and the time of the last write.
///
/// Top-level keys other than these three are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<SaleRecord>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty(Utc::now())
    }
}

impl Document {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            inventory: Vec::new(),
            sales: Vec::new(),
            last_updated: now,
            extra: Map::new(),
        }
    }

    /// Decode a backup payload uploaded for restore.
    ///
    /// The payload must be an object carrying both an `inventory` and a
    /// `sales` array. Entries are kept as sent: each needs an integer `id`
    /// and known keys must have their usual JSON type, but missing fields are
    /// allowed and unknown keys are preserved.
    pub fn from_backup(payload: Value) -> LedgerResult<Self> {
        let has_sequences = payload.get("inventory").is_some_and(Value::is_array)
            && payload.get("sales").is_some_and(Value::is_array);
        if !has_sequences {
            return Err(LedgerError::validation(INVALID_BACKUP));
        }

        serde_json::from_value(payload)
            .map_err(|e| LedgerError::validation(format!("{INVALID_BACKUP}: {e}")))
    }

    /// Highest raw identifier used by any item or sale (0 when empty).
    pub fn max_raw_id(&self) -> i64 {
        let items = self.inventory.iter().map(|i| i.id().as_raw());
        let sales = self.sales.iter().map(|s| s.id().as_raw());
        items.chain(sales).max().unwrap_or(0)
    }
}
