use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use ordermanager_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let services = Arc::new(AppServices::in_memory());
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Value {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> Value {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> Value {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn delete(&self, path: &str) -> Value {
        let res = self.client.delete(self.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn seed_customer(&self) -> i64 {
        let body = self
            .post("/customers", json!({"name": "John Doe", "email": "john@example.com"}))
            .await;
        body["data"]["id"].as_i64().unwrap()
    }

    async fn seed_item(&self, stock: i64) -> i64 {
        let body = self
            .post(
                "/inventory",
                json!({"name": "Widget", "description": "A widget", "stock": stock}),
            )
            .await;
        body["data"]["id"].as_i64().unwrap()
    }

    async fn stock_of(&self, item_id: i64) -> i64 {
        let body = self.get("/inventory").await;
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["id"] == item_id)
            .and_then(|item| item["stock"].as_i64())
            .unwrap()
    }

    async fn stock_eventually(&self, item_id: i64, expected: i64) {
        // Stock is updated by a listener, after the request has returned.
        for _ in 0..50 {
            if self.stock_of(item_id).await == expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("stock of item {item_id} did not reach {expected}");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_endpoints_answer_ok_envelope() {
    let srv = TestServer::spawn().await;

    for path in ["/", "/ok", "/health"] {
        let body = srv.get(path).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["code"], 200);
        assert_eq!(body["message"], "Success");
        assert_eq!(body["data"], "OK");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

#[tokio::test]
async fn customers_can_be_created_and_listed() {
    let srv = TestServer::spawn().await;

    let empty = srv.get("/customers").await;
    assert_eq!(empty["data"], json!([]));

    let created = srv
        .post("/customers", json!({"name": "Jane Roe", "email": "jane@example.com"}))
        .await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["name"], "Jane Roe");

    let list = srv.get("/customers").await;
    let customers = list["data"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["email"], "jane@example.com");
}

#[tokio::test]
async fn blank_customer_name_is_rejected() {
    let srv = TestServer::spawn().await;

    let body = srv
        .post("/customers", json!({"name": "  ", "email": "x@example.com"}))
        .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
    assert!(body.get("data").is_none());
    assert_eq!(srv.get("/customers").await["data"], json!([]));
}

#[tokio::test]
async fn inventory_items_can_be_created_and_listed() {
    let srv = TestServer::spawn().await;

    let id = srv.seed_item(10).await;

    let list = srv.get("/inventory").await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["description"], "A widget");
    assert_eq!(items[0]["stock"], 10);

    let negative = srv
        .post(
            "/inventory",
            json!({"name": "Broken", "description": "negative", "stock": -1}),
        )
        .await;
    assert_eq!(negative["code"], 400);
}

#[tokio::test]
async fn creating_an_order_decrements_stock() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;
    let item_id = srv.seed_item(10).await;

    let body = srv
        .post(
            "/orders",
            json!({"customerId": customer_id, "items": [{"inventoryItemId": item_id, "quantity": 2}]}),
        )
        .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["customer"]["id"], customer_id);
    assert_eq!(body["data"]["lineItems"][0]["quantity"], 2);
    assert_eq!(body["data"]["lineItems"][0]["unitPrice"], 1000);
    assert_eq!(body["data"]["totalAmount"], 2000);

    srv.stock_eventually(item_id, 8).await;

    let order_id = body["data"]["id"].as_i64().unwrap();
    let fetched = srv.get(&format!("/orders/{order_id}")).await;
    assert_eq!(fetched["data"]["id"], order_id);
    assert_eq!(srv.get("/orders").await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn order_for_unknown_customer_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let item_id = srv.seed_item(10).await;

    let body = srv
        .post(
            "/orders",
            json!({"customerId": 999, "items": [{"inventoryItemId": item_id, "quantity": 1}]}),
        )
        .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
    assert_eq!(body["message"], "Customer not found with id: 999");
    assert_eq!(srv.get("/orders").await["data"], json!([]));
}

#[tokio::test]
async fn order_for_unknown_item_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;

    let body = srv
        .post(
            "/orders",
            json!({"customerId": customer_id, "items": [{"inventoryItemId": 100, "quantity": 1}]}),
        )
        .await;

    assert_eq!(body["code"], 400);
    assert_eq!(body["message"], "Inventory item not found with id: 100");
}

#[tokio::test]
async fn oversized_quantity_is_rejected_without_touching_stock() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;
    let item_id = srv.seed_item(0).await;

    let body = srv
        .post(
            "/orders",
            json!({"customerId": customer_id, "items": [{"inventoryItemId": item_id, "quantity": i64::MAX}]}),
        )
        .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
    assert_eq!(srv.get("/orders").await["data"], json!([]));
    assert_eq!(srv.stock_of(item_id).await, 0);
}

#[tokio::test]
async fn order_without_items_field_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;

    let body = srv.post("/orders", json!({"customerId": customer_id})).await;

    assert_eq!(body["code"], 400);
    assert_eq!(srv.get("/orders").await["data"], json!([]));
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let srv = TestServer::spawn().await;

    let body = srv.get("/orders/42").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Order not found with id: 42");
}

#[tokio::test]
async fn status_update_is_stored_as_given() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;
    let item_id = srv.seed_item(10).await;
    let created = srv
        .post(
            "/orders",
            json!({"customerId": customer_id, "items": [{"inventoryItemId": item_id, "quantity": 1}]}),
        )
        .await;
    let order_id = created["data"]["id"].as_i64().unwrap();

    let body = srv
        .put(&format!("/orders/{order_id}/status"), json!({"status": "shipped"}))
        .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order status updated successfully");
    assert_eq!(body["data"]["status"], "shipped");

    let missing = srv.put("/orders/999/status", json!({"status": "SHIPPED"})).await;
    assert_eq!(missing["code"], 404);
}

#[tokio::test]
async fn deleted_order_is_gone() {
    let srv = TestServer::spawn().await;
    let customer_id = srv.seed_customer().await;
    let created = srv
        .post("/orders", json!({"customerId": customer_id, "items": []}))
        .await;
    let order_id = created["data"]["id"].as_i64().unwrap();

    let body = srv.delete(&format!("/orders/{order_id}")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], 204);
    assert_eq!(body["message"], "Order deleted successfully");
    assert!(body.get("data").is_none());

    assert_eq!(srv.get(&format!("/orders/{order_id}")).await["code"], 404);
    assert_eq!(srv.delete(&format!("/orders/{order_id}")).await["code"], 404);
}

#[tokio::test]
async fn malformed_input_gets_a_bad_request_envelope() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/orders"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);

    let bad_id = srv.get("/orders/abc").await;
    assert_eq!(bad_id["code"], 400);
}
