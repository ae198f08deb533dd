//! Integration tests for the returns surface: overdue detection, the
//! return transition, and warehouse restock scans.

mod common;

use axum::http::Method;
use chrono::{Duration, Utc};
use common::{response_json, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn create_sheet_due(app: &TestApp, expected_return_at: chrono::DateTime<Utc>) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/pull-sheets",
            Some(json!({
                "job_id": Uuid::new_v4(),
                "expected_return_at": expected_return_at.to_rfc3339(),
            })),
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

async fn overdue_ids(app: &TestApp) -> Vec<String> {
    let response = app
        .request(Method::GET, "/api/v1/returns/overdue", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    body["data"]
        .as_array()
        .expect("overdue list")
        .iter()
        .filter_map(|sheet| sheet["id"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn overdue_list_contains_only_finalized_past_due_sheets() {
    let app = TestApp::new().await;

    let past_due = create_sheet_due(&app, Utc::now() - Duration::hours(6)).await;
    let future_due = create_sheet_due(&app, Utc::now() + Duration::days(2)).await;
    let still_active = create_sheet_due(&app, Utc::now() - Duration::hours(6)).await;

    for id in [&past_due, &future_due, &still_active] {
        assert_eq!(transition(&app, id, "active").await.status(), 200);
    }
    assert_eq!(transition(&app, &past_due, "finalized").await.status(), 200);
    assert_eq!(transition(&app, &future_due, "finalized").await.status(), 200);

    let ids = overdue_ids(&app).await;
    assert!(ids.contains(&past_due));
    assert!(!ids.contains(&future_due), "not yet due");
    assert!(!ids.contains(&still_active), "only finalized sheets are overdue");
}

#[tokio::test]
async fn marking_returned_clears_the_overdue_list() {
    let app = TestApp::new().await;

    let sheet_id = create_sheet_due(&app, Utc::now() - Duration::hours(1)).await;
    transition(&app, &sheet_id, "active").await;
    transition(&app, &sheet_id, "finalized").await;

    assert!(overdue_ids(&app).await.contains(&sheet_id));

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/return", sheet_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "returned");

    assert!(!overdue_ids(&app).await.contains(&sheet_id));
}

#[tokio::test]
async fn returning_a_non_finalized_sheet_is_rejected() {
    let app = TestApp::new().await;

    let sheet_id = create_sheet_due(&app, Utc::now() - Duration::hours(1)).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/return", sheet_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400, "draft sheets cannot be returned");
}

#[tokio::test]
async fn warehouse_return_restocks_one_unit() {
    let app = TestApp::new().await;
    let item = app.seed_item("DIM-12", "Dimmer Pack", "lighting", 0).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/returns/warehouse",
            Some(json!({ "barcode": "DIM-12" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["inventory_item_id"], item.id.to_string());
    assert_eq!(body["data"]["quantity_on_hand"], 1);

    // A second return stacks.
    let response = app
        .request(
            Method::POST,
            "/api/v1/returns/warehouse",
            Some(json!({ "barcode": "DIM-12", "notes": "minor scuffs" })),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity_on_hand"], 2);

    // The catalog reflects the restock.
    let lookup = response_json(
        app.request(Method::GET, "/api/v1/inventory/barcode/DIM-12", None)
            .await,
    )
    .await;
    assert_eq!(lookup["data"]["quantity_on_hand"], 2);
}

#[tokio::test]
async fn warehouse_return_of_unknown_barcode_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/returns/warehouse",
            Some(json!({ "barcode": "GHOST-1" })),
        )
        .await;
    assert_eq!(response.status(), 404);
}
