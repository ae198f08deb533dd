//! Integration tests for the substitution workflow: candidate lookup, the
//! audited line repoint, and rejection of no-op swaps.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn setup_sheet_with_line(app: &TestApp, item_id: Uuid) -> (String, String) {
    let response = app
        .request(
            Method::POST,
            "/api/v1/pull-sheets",
            Some(json!({ "job_id": Uuid::new_v4() })),
        )
        .await;
    let sheet: Value = response_json(response).await;
    let sheet_id = sheet["data"]["id"].as_str().expect("sheet id").to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/pull-sheets/{}/items", sheet_id),
            Some(json!({ "inventory_item_id": item_id, "qty_requested": 2 })),
        )
        .await;
    let line: Value = response_json(response).await;
    let line_id = line["data"]["id"].as_str().expect("line id").to_string();

    (sheet_id, line_id)
}

#[tokio::test]
async fn candidate_list_defaults_to_same_category() {
    let app = TestApp::new().await;
    let original = app.seed_item("SPK-A", "Speaker A", "audio", 2).await;
    let same_category = app.seed_item("SPK-B", "Speaker B", "audio", 2).await;
    app.seed_item("TRI-C", "Tripod C", "grip", 2).await;

    let (sheet_id, line_id) = setup_sheet_with_line(&app, original.id).await;

    let response = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/pull-sheets/{}/items/{}/substitutes",
                sheet_id, line_id
            ),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let candidates = body["data"].as_array().expect("candidate array");
    let ids: Vec<&str> = candidates
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();

    assert!(ids.contains(&same_category.id.to_string().as_str()));
    // Neither the current item nor other categories appear.
    assert!(!ids.contains(&original.id.to_string().as_str()));
    assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn candidate_search_crosses_categories() {
    let app = TestApp::new().await;
    let original = app.seed_item("MIX-1", "Mixer", "audio", 1).await;
    let other = app.seed_item("GEN-9", "Generator", "power", 1).await;

    let (sheet_id, line_id) = setup_sheet_with_line(&app, original.id).await;

    let response = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/pull-sheets/{}/items/{}/substitutes?q=gener",
                sheet_id, line_id
            ),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let candidates = body["data"].as_array().expect("candidate array");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["id"], other.id.to_string());
}

#[tokio::test]
async fn substitution_repoints_line_and_records_audit() {
    let app = TestApp::new().await;
    let original = app.seed_item("PAR-1", "Par Can", "lighting", 4).await;
    let substitute = app.seed_item("LED-2", "LED Panel", "lighting", 4).await;

    let (sheet_id, line_id) = setup_sheet_with_line(&app, original.id).await;

    let response = app
        .request(
            Method::POST,
            &format!(
                "/api/v1/pull-sheets/{}/items/{}/substitute",
                sheet_id, line_id
            ),
            Some(json!({
                "substitute_item_id": substitute.id,
                "reason": "Original unit damaged"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["original_item_id"], original.id.to_string());
    assert_eq!(body["data"]["substitute_item_id"], substitute.id.to_string());

    // The live line now points at the substitute.
    let detail = response_json(
        app.request(Method::GET, &format!("/api/v1/pull-sheets/{}", sheet_id), None)
            .await,
    )
    .await;
    let line = &detail["data"]["items"][0];
    assert_eq!(line["inventory_item_id"], substitute.id.to_string());
    assert_eq!(line["item_name"], "LED Panel");

    // And the audit trail remembers the original.
    let audit = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/pull-sheets/{}/substitutions", sheet_id),
            None,
        )
        .await,
    )
    .await;
    let records = audit["data"].as_array().expect("substitution records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["original_item_name"], "Par Can");
    assert_eq!(records[0]["substitute_item_name"], "LED Panel");
    assert_eq!(records[0]["reason"], "Original unit damaged");
}

#[tokio::test]
async fn substituting_the_current_item_is_rejected() {
    let app = TestApp::new().await;
    let original = app.seed_item("HAZ-1", "Hazer", "effects", 1).await;

    let (sheet_id, line_id) = setup_sheet_with_line(&app, original.id).await;

    let response = app
        .request(
            Method::POST,
            &format!(
                "/api/v1/pull-sheets/{}/items/{}/substitute",
                sheet_id, line_id
            ),
            Some(json!({
                "substitute_item_id": original.id,
                "reason": "mistake"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // No audit row is written for a rejected swap.
    let audit = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/pull-sheets/{}/substitutions", sheet_id),
            None,
        )
        .await,
    )
    .await;
    assert!(audit["data"].as_array().expect("records").is_empty());
}

#[tokio::test]
async fn empty_reason_is_rejected() {
    let app = TestApp::new().await;
    let original = app.seed_item("CAS-1", "Road Case", "cases", 1).await;
    let substitute = app.seed_item("CAS-2", "Flight Case", "cases", 1).await;

    let (sheet_id, line_id) = setup_sheet_with_line(&app, original.id).await;

    let response = app
        .request(
            Method::POST,
            &format!(
                "/api/v1/pull-sheets/{}/items/{}/substitute",
                sheet_id, line_id
            ),
            Some(json!({
                "substitute_item_id": substitute.id,
                "reason": ""
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}
