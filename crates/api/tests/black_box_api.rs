use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

use repairdesk_infra::{AppConfig, FixedClock, RepairShop, StoreBackend};
use repairdesk_infra::store::InMemoryDocumentStore;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Empty in-memory shop whose clock is stopped on 2023-10-10.
    async fn spawn() -> Self {
        let clock = FixedClock(Utc.with_ymd_and_hms(2023, 10, 10, 12, 0, 0).unwrap());
        let shop = RepairShop::new(Arc::new(InMemoryDocumentStore::new()), Arc::new(clock), 5);
        Self::serve(repairdesk_api::app::router(Arc::new(shop))).await
    }

    /// Same wiring as the binary, with the sample shop loaded.
    async fn spawn_seeded() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "SEED_SAMPLE_DATA" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.store, StoreBackend::Memory);

        let app = repairdesk_api::app::build_app(&config).await.unwrap();
        Self::serve(app).await
    }

    async fn serve(app: axum::Router) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, client: reqwest::Client::new(), handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn delete(&self, path: &str) -> StatusCode {
        self.client.delete(self.url(path)).send().await.unwrap().status()
    }

    async fn stock_of(&self, part_id: &str) -> i64 {
        let (status, part) = self.get(&format!("/parts/{part_id}")).await;
        assert_eq!(status, StatusCode::OK);
        part["stock"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn completing_and_deleting_a_job_moves_stock() {
    let srv = TestServer::spawn().await;

    let (status, customer) = srv
        .post("/customers", json!({ "name": "Somchai Jaidee", "phone": "081-234-5678" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = id_of(&customer);

    let (status, part) = srv
        .post("/parts", json!({ "name": "iPhone 13 Screen", "stock": 5, "price": 2500 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let part_id = id_of(&part);

    let (status, job) = srv
        .post(
            "/repairs",
            json!({
                "customerId": customer_id,
                "deviceType": "MOBILE",
                "deviceModel": "iPhone 13 Pro",
                "issueDescription": "Cracked screen",
                "laborCost": 800,
                "assignedParts": [{ "partId": part_id, "quantity": 2 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["status"], "RECEIVED");
    assert_eq!(job["repairCode"], "RP-000001");
    assert_eq!(job["receivedDate"], "2023-10-10");
    assert_eq!(job["partsCost"], 5000);
    let job_id = id_of(&job);

    // Open jobs hold no stock.
    assert_eq!(srv.stock_of(&part_id).await, 5);

    let (status, job) = srv
        .post(&format!("/repairs/{job_id}/status"), json!({ "status": "COMPLETED" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["completedDate"], "2023-10-10");
    assert_eq!(srv.stock_of(&part_id).await, 3);

    let (status, _) = srv
        .put(&format!("/repairs/{job_id}"), json!({ "assignedParts": [{ "partId": part_id, "quantity": 1 }] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(srv.stock_of(&part_id).await, 4);

    assert_eq!(srv.delete(&format!("/repairs/{job_id}")).await, StatusCode::NO_CONTENT);
    assert_eq!(srv.stock_of(&part_id).await, 5);

    let (status, body) = srv.get(&format!("/repairs/{job_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn job_that_needs_more_than_stock_is_rejected() {
    let srv = TestServer::spawn().await;

    let (_, customer) = srv.post("/customers", json!({ "name": "Athit", "phone": "083" })).await;
    let (_, part) = srv.post("/parts", json!({ "name": "SSD 512GB", "stock": 1, "price": 2200 })).await;
    let part_id = id_of(&part);

    let (status, body) = srv
        .post(
            "/repairs",
            json!({
                "customerId": id_of(&customer),
                "deviceModel": "Dell XPS 15",
                "issueDescription": "Storage upgrade",
                "status": "COMPLETED",
                "assignedParts": [{ "partId": part_id, "quantity": 2 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["partId"], part_id.as_str());
    assert_eq!(body["current"], 1);
    assert_eq!(body["shortfall"], 1);

    assert_eq!(srv.stock_of(&part_id).await, 1);
    let (_, jobs) = srv.get("/repairs").await;
    assert!(jobs["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_customer_and_bad_input_are_client_errors() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .post(
            "/repairs",
            json!({ "customerId": "C404", "deviceModel": "Pixel 7", "issueDescription": "No sound" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = srv.post("/customers", json!({ "name": "  ", "phone": "081" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = srv.get("/repairs?status=LOST").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn adjusting_stock_cannot_go_negative() {
    let srv = TestServer::spawn().await;
    let (_, part) = srv.post("/parts", json!({ "name": "Laptop RAM DDR4 8GB", "stock": 2, "price": 1200 })).await;
    let part_id = id_of(&part);

    let (status, part) = srv
        .post(&format!("/parts/{part_id}/adjust"), json!({ "kind": "add", "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(part["stock"], 5);

    let (status, body) = srv
        .post(&format!("/parts/{part_id}/adjust"), json!({ "kind": "reduce", "quantity": 6 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invariant_violation");
    assert_eq!(srv.stock_of(&part_id).await, 5);

    let (status, body) = srv
        .post(&format!("/parts/{part_id}/adjust"), json!({ "kind": "add", "quantity": i64::MAX }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(srv.stock_of(&part_id).await, 5);
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let srv = TestServer::spawn().await;

    let (status, category) = srv.post("/categories", json!({ "name": "Screens" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = id_of(&category);

    let (_, part) = srv
        .post("/parts", json!({ "name": "iPhone 13 Screen", "stock": 5, "price": 2500, "categoryId": category_id }))
        .await;

    let (status, body) = srv.put(&format!("/categories/{category_id}"), json!({ "name": "Displays" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Displays");

    let res = srv.client.delete(srv.url(&format!("/categories/{category_id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "in_use");

    assert_eq!(srv.delete(&format!("/parts/{}", id_of(&part))).await, StatusCode::NO_CONTENT);
    assert_eq!(srv.delete(&format!("/categories/{category_id}")).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn seeded_shop_reports_dashboard_board_and_workload() {
    let srv = TestServer::spawn_seeded().await;

    let (_, parts) = srv.get("/parts").await;
    assert_eq!(parts["items"].as_array().unwrap().len(), 5);

    let (status, dashboard) = srv.get("/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["activeJobs"], 2);
    assert_eq!(dashboard["awaitingParts"], 1);
    assert_eq!(dashboard["lowStockParts"], 1);
    assert_eq!(dashboard["totalRevenue"], 800 + 2500 + 1000 + 3400);
    assert_eq!(dashboard["laborRevenue"], 1800);

    let (status, board) = srv.get("/monitor").await;
    assert_eq!(status, StatusCode::OK);
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    let cards: usize = columns.iter().map(|c| c["cards"].as_array().unwrap().len()).sum();
    assert_eq!(cards, 2);

    let (status, workload) = srv.get("/technicians/T002/workload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(workload["activeJobs"], 1);

    let (_, found) = srv.get("/repairs?q=macbook").await;
    let found = found["items"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["repairCode"], "RP-000002");

    let (_, done) = srv.get("/repairs?status=completed&customer_id=C001").await;
    assert_eq!(done["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn backup_export_import_and_seed() {
    let srv = TestServer::spawn().await;

    let (status, summary) = srv.post("/seed", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["repairJobs"], 4);

    let res = srv.client.get(srv.url("/backup")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res.headers()["content-disposition"].to_str().unwrap().to_string();
    assert_eq!(disposition, "attachment; filename=\"repairsys-backup-2023-10-10T12-00-00.json\"");
    let backup: Value = res.json().await.unwrap();
    assert_eq!(backup["parts"].as_array().unwrap().len(), 5);

    let (status, body) = srv.post("/backup", json!({ "customers": [], "parts": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid backup format"));

    // Wipe the shop, then restore the export.
    let empty = json!({ "customers": [], "technicians": [], "parts": [], "repairJobs": [] });
    let (status, _) = srv.post("/backup", empty).await;
    assert_eq!(status, StatusCode::OK);
    let (_, parts) = srv.get("/parts").await;
    assert!(parts["items"].as_array().unwrap().is_empty());

    let (status, summary) = srv.post("/backup", backup.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["parts"], 5);

    let (_, again) = srv.get("/backup").await;
    assert_eq!(again, backup);
}
