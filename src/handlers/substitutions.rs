use crate::{
    commands::substitutions::RecordSubstitutionCommand,
    entities::substitution,
    errors::ServiceError,
    handlers::inventory::InventoryItemSummary,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct CandidateQuery {
    /// Name/barcode search; same-category candidates when omitted.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubstituteRequest {
    pub substitute_item_id: Uuid,
    #[validate(length(min = 1, message = "Reason cannot be empty"))]
    pub reason: String,
    pub qty_affected: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubstitutionSummary {
    pub id: Uuid,
    pub pull_sheet_item_id: Uuid,
    pub original_item_id: Uuid,
    pub original_item_name: String,
    pub substitute_item_id: Uuid,
    pub substitute_item_name: String,
    pub reason: String,
    pub qty_affected: i32,
    pub created_at: DateTime<Utc>,
}

impl From<substitution::Model> for SubstitutionSummary {
    fn from(model: substitution::Model) -> Self {
        Self {
            id: model.id,
            pull_sheet_item_id: model.pull_sheet_item_id,
            original_item_id: model.original_item_id,
            original_item_name: model.original_item_name,
            substitute_item_id: model.substitute_item_id,
            substitute_item_name: model.substitute_item_name,
            reason: model.reason,
            qty_affected: model.qty_affected,
            created_at: to_utc(model.created_at),
        }
    }
}

pub async fn list_substitute_candidates(
    State(state): State<AppState>,
    Path((sheet_id, item_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<CandidateQuery>,
) -> ApiResult<Vec<InventoryItemSummary>> {
    let candidates = state
        .substitution_service()
        .list_candidates(sheet_id, item_id, query.q.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        candidates
            .into_iter()
            .map(InventoryItemSummary::from)
            .collect(),
    )))
}

pub async fn substitute_pull_sheet_item(
    State(state): State<AppState>,
    Path((sheet_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SubstituteRequest>,
) -> ApiResult<serde_json::Value> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let command = RecordSubstitutionCommand {
        pull_sheet_id: sheet_id,
        pull_sheet_item_id: item_id,
        substitute_item_id: payload.substitute_item_id,
        reason: payload.reason,
        qty_affected: payload.qty_affected,
    };

    let result = state
        .substitution_service()
        .record_substitution(command)
        .await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "substitution_id": result.substitution_id,
        "pull_sheet_item_id": result.pull_sheet_item_id,
        "original_item_id": result.original_item_id,
        "original_item_name": result.original_item_name,
        "substitute_item_id": result.substitute_item_id,
        "substitute_item_name": result.substitute_item_name,
    }))))
}

pub async fn list_substitutions(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
) -> ApiResult<Vec<SubstitutionSummary>> {
    let records = state
        .substitution_service()
        .list_for_sheet(sheet_id)
        .await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(SubstitutionSummary::from).collect(),
    )))
}

fn to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
}
