//! Integration tests for pull sheet lifecycle and manifest management.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

async fn create_sheet(app: &TestApp) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/pull-sheets",
            Some(json!({ "job_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    body["data"]["id"].as_str().expect("sheet id").to_string()
}

async fn transition(app: &TestApp, sheet_id: &str, status: &str) -> axum::response::Response {
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/status", sheet_id),
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn lifecycle_follows_the_declared_transitions() {
    let app = TestApp::new().await;
    let sheet_id = create_sheet(&app).await;

    // Draft -> Active -> Draft -> Active -> Finalized -> Returned
    assert_eq!(transition(&app, &sheet_id, "active").await.status(), 200);
    assert_eq!(transition(&app, &sheet_id, "draft").await.status(), 200);
    assert_eq!(transition(&app, &sheet_id, "active").await.status(), 200);
    assert_eq!(transition(&app, &sheet_id, "finalized").await.status(), 200);

    let response = transition(&app, &sheet_id, "returned").await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "returned");
}

#[tokio::test]
async fn undeclared_transitions_are_rejected() {
    let app = TestApp::new().await;
    let sheet_id = create_sheet(&app).await;

    // Draft cannot jump straight to finalized or returned.
    assert_eq!(transition(&app, &sheet_id, "finalized").await.status(), 400);
    assert_eq!(transition(&app, &sheet_id, "returned").await.status(), 400);

    // Returned is terminal.
    transition(&app, &sheet_id, "active").await;
    transition(&app, &sheet_id, "finalized").await;
    transition(&app, &sheet_id, "returned").await;
    assert_eq!(transition(&app, &sheet_id, "active").await.status(), 400);
    assert_eq!(transition(&app, &sheet_id, "draft").await.status(), 400);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new().await;
    let draft_id = create_sheet(&app).await;
    let active_id = create_sheet(&app).await;
    transition(&app, &active_id, "active").await;

    let response = app
        .request(Method::GET, "/api/v1/pull-sheets?status=active", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let items = body["data"]["items"].as_array().expect("sheet list");
    let ids: Vec<&str> = items.iter().filter_map(|s| s["id"].as_str()).collect();
    assert!(ids.contains(&active_id.as_str()));
    assert!(!ids.contains(&draft_id.as_str()));
}

#[tokio::test]
async fn adding_items_requires_known_catalog_entries() {
    let app = TestApp::new().await;
    let sheet_id = create_sheet(&app).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/items", sheet_id),
            Some(json!({ "inventory_item_id": Uuid::new_v4(), "qty_requested": 1 })),
        )
        .await;
    assert_eq!(response.status(), 404);

    let item = app.seed_item("FOG-1", "Fog Machine", "effects", 2).await;
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/items", sheet_id),
            Some(json!({ "inventory_item_id": item.id, "qty_requested": 0 })),
        )
        .await;
    assert_eq!(response.status(), 400, "qty_requested must be positive");
}

#[tokio::test]
async fn delete_removes_the_sheet_and_its_lines() {
    let app = TestApp::new().await;
    let item = app.seed_item("TRU-8", "Truss Section", "rigging", 12).await;

    let sheet_id = create_sheet(&app).await;
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/items", sheet_id),
        Some(json!({ "inventory_item_id": item.id, "qty_requested": 4 })),
    )
    .await;
    transition(&app, &sheet_id, "active").await;
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/scans", sheet_id),
        Some(json!({ "barcode": "TRU-8" })),
    )
    .await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/pull-sheets/{}", sheet_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(Method::GET, &format!("/api/v1/pull-sheets/{}", sheet_id), None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn inventory_crud_and_barcode_lookup() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "barcode": "PROJ-4K",
                "name": "4K Projector",
                "category": "video",
                "quantity_on_hand": 3,
                "daily_rate": dec!(149.50)
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let created = response_json(response).await;
    let item_id = created["data"]["id"].as_str().expect("item id").to_string();

    // Duplicate barcodes are rejected.
    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "barcode": "PROJ-4K",
                "name": "Another Projector",
                "category": "video"
            })),
        )
        .await;
    assert_eq!(response.status(), 409);

    let by_id = response_json(
        app.request(Method::GET, &format!("/api/v1/inventory/{}", item_id), None)
            .await,
    )
    .await;
    assert_eq!(by_id["data"]["barcode"], "PROJ-4K");

    let by_barcode = response_json(
        app.request(Method::GET, "/api/v1/inventory/barcode/PROJ-4K", None)
            .await,
    )
    .await;
    assert_eq!(by_barcode["data"]["id"], item_id);

    // Name search.
    let listed = response_json(
        app.request(Method::GET, "/api/v1/inventory?q=projector", None)
            .await,
    )
    .await;
    assert_eq!(listed["data"]["total"], 1);
}
