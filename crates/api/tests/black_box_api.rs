use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use shopledger_api::config::ServerConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(data_file: PathBuf) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let config = ServerConfig {
            data_file,
            ..ServerConfig::default()
        };
        let app = shopledger_api::app::build_app(&config).expect("failed to open ledger");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn fresh() -> (TempDir, TestServer, reqwest::Client) {
    let dir = TempDir::new().unwrap();
    let srv = TestServer::spawn(dir.path().join("shop-data.json")).await;
    (dir, srv, reqwest::Client::new())
}

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    let res = client.get(url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn add_bucket(client: &reqwest::Client, srv: &TestServer) -> Value {
    let res = client
        .post(srv.url("/api/inventory"))
        .json(&json!({
            "name": "Bucket",
            "quantity": 10,
            "costPrice": 2,
            "warehouse": "A",
            "colour": "blue"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    body["item"].clone()
}

#[tokio::test]
async fn health_and_request_id() {
    let (_dir, srv, client) = fresh().await;

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = client
        .get(srv.url("/health"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn first_run_creates_empty_document() {
    let (dir, srv, client) = fresh().await;

    assert!(dir.path().join("shop-data.json").exists());

    let data = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(data["inventory"], json!([]));
    assert_eq!(data["sales"], json!([]));
    assert!(data["lastUpdated"].is_string());
}

#[tokio::test]
async fn bucket_scenario_sell_and_undo() {
    let (_dir, srv, client) = fresh().await;

    let item = add_bucket(&client, &srv).await;
    let item_id = item["id"].as_i64().expect("numeric id");
    assert_eq!(item["quantity"], json!(10));
    assert_eq!(item["colour"], json!("blue"));
    assert_eq!(
        item["dateAdded"],
        json!(chrono::Utc::now().date_naive().to_string())
    );

    let inventory = get_json(&client, srv.url("/api/inventory")).await;
    let listed: Vec<_> = inventory
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["id"] == json!(item_id))
        .collect();
    assert_eq!(listed.len(), 1);

    let res = client
        .post(srv.url("/api/sales"))
        .json(&json!({
            "itemId": item_id,
            "quantity": 3,
            "salePrice": 5,
            "customerName": "Ada",
            "saleDate": "2024-03-15"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let sale = &body["sale"];
    assert_eq!(sale["totalAmount"].as_f64(), Some(15.0));
    assert_eq!(sale["profit"].as_f64(), Some(9.0));
    assert_eq!(sale["itemName"], json!("Bucket"));
    assert_eq!(sale["warehouse"], json!("A"));
    let sale_id = sale["id"].as_i64().unwrap();

    let inventory = get_json(&client, srv.url("/api/inventory")).await;
    assert_eq!(inventory[0]["quantity"], json!(7));

    let res = client
        .delete(srv.url(&format!("/api/sales/{sale_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Sale deleted and inventory restored"));

    let data = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(data["inventory"][0]["quantity"], json!(10));
    assert_eq!(data["sales"], json!([]));
}

#[tokio::test]
async fn insufficient_stock_is_rejected_without_side_effects() {
    let (_dir, srv, client) = fresh().await;
    let item = add_bucket(&client, &srv).await;
    let before = get_json(&client, srv.url("/api/data")).await;

    let res = client
        .post(srv.url("/api/sales"))
        .json(&json!({"itemId": item["id"], "quantity": 11, "salePrice": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("Insufficient stock"));

    let after = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn sale_of_unknown_item_is_not_found() {
    let (_dir, srv, client) = fresh().await;

    let res = client
        .post(srv.url("/api/sales"))
        .json(&json!({"itemId": 12345, "quantity": 1, "salePrice": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("Item not found in inventory"));
}

#[tokio::test]
async fn update_merges_fields_and_unknown_ids_are_not_found() {
    let (_dir, srv, client) = fresh().await;
    let item = add_bucket(&client, &srv).await;
    let item_id = item["id"].as_i64().unwrap();

    let res = client
        .put(srv.url(&format!("/api/inventory/{item_id}")))
        .json(&json!({"quantity": 25, "shelf": "B2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let updated = &body["item"];
    assert_eq!(updated["id"], json!(item_id));
    assert_eq!(updated["quantity"], json!(25));
    assert_eq!(updated["name"], json!("Bucket"));
    assert_eq!(updated["colour"], json!("blue"));
    assert_eq!(updated["shelf"], json!("B2"));

    let res = client
        .put(srv.url("/api/inventory/1"))
        .json(&json!({"quantity": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("Item not found"));
}

#[tokio::test]
async fn deleting_unknown_ids_leaves_document_unchanged() {
    let (_dir, srv, client) = fresh().await;
    add_bucket(&client, &srv).await;
    let before = get_json(&client, srv.url("/api/data")).await;

    for path in ["/api/inventory/1", "/api/sales/1"] {
        let res = client.delete(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let after = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn delete_item_then_its_sale() {
    let (_dir, srv, client) = fresh().await;
    let item = add_bucket(&client, &srv).await;
    let item_id = item["id"].as_i64().unwrap();

    let res = client
        .post(srv.url("/api/sales"))
        .json(&json!({"itemId": item_id.to_string(), "quantity": 2, "salePrice": 4}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let sale_id = body["sale"]["id"].as_i64().unwrap();

    let res = client
        .delete(srv.url(&format!("/api/inventory/{item_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Item deleted successfully"));

    let sales = get_json(&client, srv.url("/api/sales")).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);

    let res = client
        .delete(srv.url(&format!("/api/sales/{sale_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Sale deleted; item no longer in inventory"));
    assert_eq!(get_json(&client, srv.url("/api/inventory")).await, json!([]));
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let (_dir, srv, client) = fresh().await;

    let res = client
        .post(srv.url("/api/inventory"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());

    let res = client
        .post(srv.url("/api/inventory"))
        .json(&json!({"name": "", "quantity": 1, "costPrice": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .delete(srv.url("/api/inventory/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("invalid item id"));
}

#[tokio::test]
async fn backup_then_restore_round_trips() {
    let (_dir, srv, client) = fresh().await;
    let item = add_bucket(&client, &srv).await;
    client
        .post(srv.url("/api/sales"))
        .json(&json!({"itemId": item["id"], "quantity": 4, "salePrice": 3.5}))
        .send()
        .await
        .unwrap();

    let res = client.get(srv.url("/api/backup")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=backup-"));
    assert!(disposition.ends_with(".json"));
    let backup: Value = res.json().await.unwrap();

    let res = client
        .post(srv.url("/api/restore"))
        .json(&backup)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("Data restored successfully"));

    let data = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(data["inventory"], backup["inventory"]);
    assert_eq!(data["sales"], backup["sales"]);
}

#[tokio::test]
async fn restore_replaces_document_and_validates_shape() {
    let (_dir, srv, client) = fresh().await;
    add_bucket(&client, &srv).await;

    let res = client
        .post(srv.url("/api/restore"))
        .json(&json!({"inventory": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("Invalid backup data format"));

    let payload = json!({
        "inventory": [{
            "id": 7,
            "name": "Crate",
            "quantity": 3,
            "costPrice": 1.5,
            "warehouse": "C",
            "dateAdded": "2023-12-31"
        }],
        "sales": []
    });
    let res = client
        .post(srv.url("/api/restore"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let data = get_json(&client, srv.url("/api/data")).await;
    assert_eq!(data["inventory"], payload["inventory"]);
    assert_eq!(data["sales"], payload["sales"]);
}

#[tokio::test]
async fn restore_keeps_records_written_by_older_clients() {
    let (_dir, srv, client) = fresh().await;

    // Whole-number prices, no saleDate or warehouse, extra keys at every level.
    let mut payload = json!({
        "inventory": [{
            "id": 1710000000000_i64,
            "name": "Bucket",
            "quantity": 7,
            "costPrice": 2,
            "dateAdded": "2024-03-09",
            "colour": "red"
        }],
        "sales": [{
            "id": 1710000000500_i64,
            "itemId": 1710000000000_i64,
            "itemName": "Bucket",
            "quantity": 3,
            "salePrice": 5,
            "totalAmount": 15,
            "costPrice": 2,
            "profit": 9,
            "customerName": "Ada",
            "receipt": "R-17"
        }],
        "lastUpdated": "2024-03-09T12:00:00.000Z",
        "exportedFrom": "till-2"
    });

    let res = client
        .post(srv.url("/api/restore"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mut data = get_json(&client, srv.url("/api/data")).await;
    assert!(data["lastUpdated"].is_string());
    data.as_object_mut().unwrap().remove("lastUpdated");
    payload.as_object_mut().unwrap().remove("lastUpdated");
    assert_eq!(data, payload);

    let res = client
        .delete(srv.url("/api/sales/1710000000500"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let inventory = get_json(&client, srv.url("/api/inventory")).await;
    assert_eq!(inventory[0]["quantity"], json!(10));
    assert_eq!(inventory[0]["costPrice"], json!(2));
}

#[tokio::test]
async fn state_survives_server_restart() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("shop-data.json");
    let client = reqwest::Client::new();

    let item_id = {
        let srv = TestServer::spawn(data_file.clone()).await;
        add_bucket(&client, &srv).await["id"].clone()
    };

    let srv = TestServer::spawn(data_file).await;
    let inventory = get_json(&client, srv.url("/api/inventory")).await;
    assert_eq!(inventory[0]["id"], item_id);
    assert_eq!(inventory[0]["quantity"], json!(10));
}
