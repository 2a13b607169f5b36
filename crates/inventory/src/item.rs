use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopledger_core::{Amount, Entity, ItemId, LedgerError, LedgerResult};

/// Keys the caller may not set through an add or update request.
const RESERVED_KEYS: &[&str] = &["id", "dateAdded"];

/// A stock-keeping record.
///
/// Known fields are typed; anything else the caller sent (colour, supplier,
/// notes, ...) is kept verbatim in `attributes` and written back flattened
/// next to them. Only `id` is required: records restored from a backup may
/// lack any other field, and a missing field stays missing when written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost_price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_added: Option<String>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

/// Request: add a new item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub cost_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Request: field-level overrides for an existing item.
///
/// `None` means "leave unchanged". Attributes are merged key by key;
/// `id` and `dateAdded` land there too and are discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl InventoryItem {
    /// Build a validated item from an add request.
    pub fn create(id: ItemId, request: NewItem, date_added: NaiveDate) -> LedgerResult<Self> {
        validate(&request.name, request.quantity, request.cost_price)?;

        let mut attributes = request.attributes;
        strip_reserved(&mut attributes);

        Ok(Self {
            id,
            name: Some(request.name),
            quantity: Some(request.quantity),
            cost_price: Some(Amount::from_f64(request.cost_price)),
            warehouse: request.warehouse,
            date_added: Some(date_added.format("%Y-%m-%d").to_string()),
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Units on hand; a record without a quantity holds none.
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    pub fn cost_price(&self) -> f64 {
        self.cost_price.as_ref().map_or(0.0, Amount::as_f64)
    }

    /// The cost price exactly as stored, if the record has one.
    pub fn cost_price_amount(&self) -> Option<&Amount> {
        self.cost_price.as_ref()
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    pub fn date_added(&self) -> Option<&str> {
        self.date_added.as_deref()
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Shallow-merge `patch` over this item.
    ///
    /// The merged record is validated before anything is written, so a
    /// rejected patch leaves the item untouched. `id` and `dateAdded` never
    /// change.
    pub fn apply_patch(&mut self, patch: ItemPatch) -> LedgerResult<()> {
        let name = patch.name.as_deref().unwrap_or(self.name());
        let quantity = patch.quantity.unwrap_or(self.quantity());
        let cost_price = patch.cost_price.unwrap_or(self.cost_price());
        validate(name, quantity, cost_price)?;

        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = Some(quantity);
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = Some(Amount::from_f64(cost_price));
        }
        if let Some(warehouse) = patch.warehouse {
            self.warehouse = Some(warehouse);
        }

        let mut attributes = patch.attributes;
        strip_reserved(&mut attributes);
        self.attributes.extend(attributes);
        Ok(())
    }

    /// Take `quantity` units out of stock.
    ///
    /// Selling exactly what is on hand is allowed; more than that is not.
    pub fn withdraw(&mut self, quantity: i64) -> LedgerResult<()> {
        let available = self.quantity();
        if quantity > available {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available,
            });
        }
        self.quantity = Some(available - quantity);
        Ok(())
    }

    /// Put `quantity` units back into stock.
    pub fn restock(&mut self, quantity: i64) {
        self.quantity = Some(self.quantity().saturating_add(quantity));
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

fn validate(name: &str, quantity: i64, cost_price: f64) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation("name cannot be empty"));
    }
    if quantity < 0 {
        return Err(LedgerError::validation("quantity cannot be negative"));
    }
    if !cost_price.is_finite() || cost_price < 0.0 {
        return Err(LedgerError::validation(
            "costPrice must be a non-negative number",
        ));
    }
    Ok(())
}

fn strip_reserved(attributes: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        attributes.remove(*key);
    }
}
