//! Integration tests for the barcode scan workflow: lazy line creation,
//! pulled-counter updates, duplicate rejection, and draft-mode behavior.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
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
    assert_eq!(body["data"]["status"], "draft");
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

async fn sheet_detail(app: &TestApp, sheet_id: &str) -> Value {
    let response = app
        .request(Method::GET, &format!("/api/v1/pull-sheets/{}", sheet_id), None)
        .await;
    assert_eq!(response.status(), 200);
    response_json(response).await
}

async fn scan(app: &TestApp, sheet_id: &str, barcode: &str) -> axum::response::Response {
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/scans", sheet_id),
        Some(json!({ "barcode": barcode })),
    )
    .await
}

#[tokio::test]
async fn active_scan_increments_pulled_counter() {
    let app = TestApp::new().await;
    let item = app.seed_item("CAM-001", "Camera Body", "cameras", 5).await;

    let sheet_id = create_sheet(&app).await;
    let add = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/items", sheet_id),
            Some(json!({ "inventory_item_id": item.id, "qty_requested": 1 })),
        )
        .await;
    assert_eq!(add.status(), 200);

    let activate = transition(&app, &sheet_id, "active").await;
    assert_eq!(activate.status(), 200);

    let response = scan(&app, &sheet_id, "CAM-001").await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert!(body["success"].as_bool().unwrap_or(false));
    assert_eq!(body["data"]["qty_pulled"], 1);
    assert_eq!(body["data"]["unit_tracked"], true);
    assert_eq!(body["data"]["item_name"], "Camera Body");

    let detail = sheet_detail(&app, &sheet_id).await;
    let line = &detail["data"]["items"][0];
    assert_eq!(line["qty_pulled"], 1);
    assert_eq!(line["prep_status"], "complete");
}

#[tokio::test]
async fn duplicate_active_scan_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let item = app.seed_item("LENS-001", "50mm Lens", "lenses", 3).await;

    let sheet_id = create_sheet(&app).await;
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/items", sheet_id),
        Some(json!({ "inventory_item_id": item.id, "qty_requested": 2 })),
    )
    .await;
    transition(&app, &sheet_id, "active").await;

    let first = scan(&app, &sheet_id, "LENS-001").await;
    assert_eq!(first.status(), 200);

    let second = scan(&app, &sheet_id, "LENS-001").await;
    assert_eq!(second.status(), 409, "same barcode on same line must conflict");

    let body = response_json(second).await;
    assert_eq!(body["error"], "Conflict");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("LENS-001"));

    // The rejected scan must not have touched the counter.
    let detail = sheet_detail(&app, &sheet_id).await;
    let line = &detail["data"]["items"][0];
    assert_eq!(line["qty_pulled"], 1);
    assert_eq!(line["prep_status"], "in_progress");
}

#[tokio::test]
async fn active_scan_of_unlisted_barcode_creates_line_lazily() {
    let app = TestApp::new().await;
    let item = app.seed_item("CBL-042", "XLR Cable", "cables", 20).await;

    let sheet_id = create_sheet(&app).await;
    transition(&app, &sheet_id, "active").await;

    let response = scan(&app, &sheet_id, "CBL-042").await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["inventory_item_id"], item.id.to_string());
    assert_eq!(body["data"]["qty_pulled"], 1);

    let detail = sheet_detail(&app, &sheet_id).await;
    let items = detail["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["qty_requested"], 1);
    assert_eq!(items[0]["prep_status"], "complete");
}

#[tokio::test]
async fn unknown_barcode_returns_not_found_with_no_side_effects() {
    let app = TestApp::new().await;

    let sheet_id = create_sheet(&app).await;
    transition(&app, &sheet_id, "active").await;

    let response = scan(&app, &sheet_id, "NOPE-999").await;
    assert_eq!(response.status(), 404);

    let detail = sheet_detail(&app, &sheet_id).await;
    let items = detail["data"]["items"].as_array().expect("items array");
    assert!(items.is_empty(), "no line may be created for an unknown barcode");
}

#[tokio::test]
async fn draft_scans_skip_unit_tracking() {
    let app = TestApp::new().await;
    let item = app.seed_item("STND-007", "Light Stand", "grip", 8).await;

    let sheet_id = create_sheet(&app).await;
    app.request(
        Method::POST,
        &format!("/api/v1/pull-sheets/{}/items", sheet_id),
        Some(json!({ "inventory_item_id": item.id, "qty_requested": 4 })),
    )
    .await;

    // Sheet stays in draft; scans are recorded but never unit-tracked.
    let first = scan(&app, &sheet_id, "STND-007").await;
    assert_eq!(first.status(), 200);
    let body = response_json(first).await;
    assert_eq!(body["data"]["unit_tracked"], false);
    assert_eq!(body["data"]["qty_pulled"], 0);

    // A repeat of the same barcode is fine in draft mode.
    let second = scan(&app, &sheet_id, "STND-007").await;
    assert_eq!(second.status(), 200);

    let detail = sheet_detail(&app, &sheet_id).await;
    let line = &detail["data"]["items"][0];
    assert_eq!(line["qty_pulled"], 0);
    assert_eq!(line["prep_status"], "pending");

    // Both scans still land in the history trail.
    let history = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/pull-sheets/{}/scans", sheet_id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(history["data"]["total"], 2);
}

#[tokio::test]
async fn scan_history_lists_newest_first() {
    let app = TestApp::new().await;
    app.seed_item("A-1", "Item A", "misc", 1).await;
    app.seed_item("B-2", "Item B", "misc", 1).await;

    let sheet_id = create_sheet(&app).await;
    transition(&app, &sheet_id, "active").await;

    assert_eq!(scan(&app, &sheet_id, "A-1").await.status(), 200);
    assert_eq!(scan(&app, &sheet_id, "B-2").await.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/pull-sheets/{}/scans", sheet_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 2);
    let entries = body["data"]["items"].as_array().expect("scan entries");
    assert_eq!(entries.len(), 2);
}
