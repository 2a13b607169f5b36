//! Integration tests for the full persistence pipeline.
//!
//! Tests: request → LedgerService → ledger operation → JsonFileStore → disk
//!
//! Verifies:
//! - Every committed mutation survives a restart
//! - Backup → restore is a no-op on observable state
//! - Rejected operations never reach the file

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use shopledger_core::{Entity, ItemId, LedgerError, SaleId};
    use shopledger_inventory::{ItemPatch, NewItem};
    use shopledger_sales::RecordSale;

    use crate::ledger_service::LedgerService;
    use crate::store::{DocumentStore, JsonFileStore};

    fn open(dir: &TempDir) -> LedgerService<JsonFileStore> {
        let store = JsonFileStore::new(dir.path().join("shop-data.json"));
        store.initialize().unwrap();
        let (service, degraded) = LedgerService::open(store);
        assert!(degraded.is_none());
        service
    }

    fn new_item(name: &str, quantity: i64) -> NewItem {
        serde_json::from_value(json!({
            "name": name,
            "quantity": quantity,
            "costPrice": 2,
            "warehouse": "A",
            "supplier": "Acme"
        }))
        .unwrap()
    }

    fn sell(item_id: ItemId, quantity: i64, sale_price: f64) -> RecordSale {
        RecordSale {
            item_id,
            quantity,
            sale_price,
            customer_name: Some("Ada".into()),
            sale_date: None,
        }
    }

    #[test]
    fn committed_state_survives_restart() {
        let dir = TempDir::new().unwrap();

        let (item_id, sale_id) = {
            let service = open(&dir);
            let item = service.add_item(new_item("Bucket", 10)).unwrap();
            let sale = service.record_sale(sell(item.id(), 3, 5.0)).unwrap();
            (item.id(), sale.id())
        };

        let reopened = open(&dir);
        let inventory = reopened.inventory();
        let sales = reopened.sales();

        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].id(), item_id);
        assert_eq!(inventory[0].quantity(), 7);
        assert_eq!(inventory[0].attributes().get("supplier"), Some(&json!("Acme")));
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id(), sale_id);
        assert_eq!(sales[0].total_amount(), 15.0);
        assert_eq!(sales[0].profit(), 9.0);
    }

    #[test]
    fn bucket_scenario_end_to_end() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);

        let item = service.add_item(new_item("Bucket", 10)).unwrap();
        let sale = service.record_sale(sell(item.id(), 3, 5.0)).unwrap();
        assert_eq!(service.inventory()[0].quantity(), 7);

        let removal = service.delete_sale(sale.id()).unwrap();
        assert!(removal.stock_restored);

        let on_disk = service.store().read().unwrap();
        assert_eq!(on_disk.inventory[0].quantity(), 10);
        assert!(on_disk.sales.is_empty());
    }

    #[test]
    fn backup_then_restore_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        let a = service.add_item(new_item("Bucket", 10)).unwrap();
        service.add_item(new_item("Tub", 4)).unwrap();
        service.record_sale(sell(a.id(), 2, 3.5)).unwrap();

        let backup = serde_json::to_value(service.document()).unwrap();
        service.restore(backup.clone()).unwrap();

        let after = serde_json::to_value(service.document()).unwrap();
        assert_eq!(after["inventory"], backup["inventory"]);
        assert_eq!(after["sales"], backup["sales"]);
    }

    #[test]
    fn restore_replaces_unrelated_state() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        service.add_item(new_item("Bucket", 10)).unwrap();

        let payload = json!({
            "inventory": [{
                "id": 5,
                "name": "Crate",
                "quantity": 2,
                "costPrice": 1.25,
                "warehouse": "C",
                "dateAdded": "2023-12-31"
            }],
            "sales": []
        });
        service.restore(payload.clone()).unwrap();

        let reopened = open(&dir);
        let doc = serde_json::to_value(reopened.document()).unwrap();
        assert_eq!(doc["inventory"], payload["inventory"]);
        assert_eq!(doc["sales"], json!([]));
    }

    #[test]
    fn restored_records_survive_restart_unchanged() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);

        let mut payload = json!({
            "inventory": [{
                "id": 1710000000000_i64,
                "name": "Tub",
                "quantity": 2,
                "dateAdded": "2024-03-09"
            }],
            "sales": [{
                "id": 1710000000001_i64,
                "itemId": 1710000000000_i64,
                "itemName": "Tub",
                "quantity": 1,
                "salePrice": 4,
                "totalAmount": 4,
                "costPrice": 2,
                "profit": 2,
                "till": 3
            }],
            "lastUpdated": "2024-03-09T12:00:00.000Z",
            "currency": "EUR"
        });
        service.restore(payload.clone()).unwrap();

        let reopened = open(&dir);
        let mut doc = serde_json::to_value(reopened.document()).unwrap();
        let object = doc.as_object_mut().unwrap();
        assert!(object.remove("lastUpdated").is_some());
        payload.as_object_mut().unwrap().remove("lastUpdated");
        assert_eq!(doc, payload);
    }

    #[test]
    fn rejected_operations_do_not_touch_the_file() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        let item = service.add_item(new_item("Bucket", 1)).unwrap();
        let on_disk = service.store().read().unwrap();

        assert!(matches!(
            service.record_sale(sell(item.id(), 2, 1.0)),
            Err(LedgerError::InsufficientStock { .. })
        ));
        assert_eq!(
            service.delete_sale(SaleId::from_raw(1)).unwrap_err(),
            LedgerError::not_found("Sale")
        );
        assert_eq!(
            service.delete_item(ItemId::from_raw(1)).unwrap_err(),
            LedgerError::not_found("Item")
        );
        let blank_name = ItemPatch {
            name: Some(String::new()),
            ..ItemPatch::default()
        };
        assert!(matches!(
            service.update_item(item.id(), blank_name),
            Err(LedgerError::Validation(_))
        ));

        assert_eq!(service.store().read().unwrap(), on_disk);
    }
}
