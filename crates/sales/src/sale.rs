use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopledger_core::{Amount, Entity, ItemId, LedgerError, LedgerResult, SaleId};
use shopledger_inventory::InventoryItem;

/// A recorded sale.
///
/// Everything but `id` is optional so sales written by older clients or
/// restored from a backup are kept exactly as they were, unknown keys
/// included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    id: SaleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sale_price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost_price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profit: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sale_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warehouse: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Request: sell `quantity` units of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSale {
    pub item_id: ItemId,
    pub quantity: i64,
    pub sale_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Defaults to the day the sale is recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<NaiveDate>,
}

impl RecordSale {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.quantity <= 0 {
            return Err(LedgerError::validation("quantity must be positive"));
        }
        if !self.sale_price.is_finite() || self.sale_price < 0.0 {
            return Err(LedgerError::validation(
                "salePrice must be a non-negative number",
            ));
        }
        Ok(())
    }
}

impl SaleRecord {
    /// Snapshot a sale of `item` as it stands right now.
    ///
    /// Does not touch the item's stock; the caller withdraws it.
    pub fn snapshot(
        id: SaleId,
        item: &InventoryItem,
        request: &RecordSale,
        today: NaiveDate,
    ) -> Self {
        let quantity = request.quantity;
        let quantity_f = quantity as f64;
        let sale_date = request.sale_date.unwrap_or(today);
        Self {
            id,
            item_id: Some(item.id()),
            item_name: Some(item.name().to_string()),
            quantity: Some(quantity),
            sale_price: Some(Amount::from_f64(request.sale_price)),
            total_amount: Some(Amount::from_f64(quantity_f * request.sale_price)),
            cost_price: item.cost_price_amount().cloned(),
            profit: Some(Amount::from_f64(
                (request.sale_price - item.cost_price()) * quantity_f,
            )),
            customer_name: request.customer_name.clone(),
            sale_date: Some(sale_date.format("%Y-%m-%d").to_string()),
            warehouse: item.warehouse().map(str::to_string),
            extra: Map::new(),
        }
    }

    /// The sold item, if the record names one.
    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        self.item_name.as_deref().unwrap_or_default()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price.as_ref().map_or(0.0, Amount::as_f64)
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount.as_ref().map_or(0.0, Amount::as_f64)
    }

    pub fn cost_price(&self) -> f64 {
        self.cost_price.as_ref().map_or(0.0, Amount::as_f64)
    }

    pub fn profit(&self) -> f64 {
        self.profit.as_ref().map_or(0.0, Amount::as_f64)
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn sale_date(&self) -> Option<&str> {
        self.sale_date.as_deref()
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    /// Keys this record carries beyond the ones listed above.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Entity for SaleRecord {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}
