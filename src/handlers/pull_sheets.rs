use crate::{
    entities::{
        pull_sheet::{self, PullSheetStatus},
        pull_sheet_item::{self, PrepStatus},
    },
    errors::ServiceError,
    services::pull_sheets::{AddPullSheetItemInput, CreatePullSheetInput},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct PullSheetListQuery {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub limit: Option<u64>,
    /// Optional status filter
    pub status: Option<PullSheetStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PullSheetSummary {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: PullSheetStatus,
    pub scheduled_out_at: Option<DateTime<Utc>>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<pull_sheet::Model> for PullSheetSummary {
    fn from(model: pull_sheet::Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            status: model.status,
            scheduled_out_at: model.scheduled_out_at.map(to_utc),
            expected_return_at: model.expected_return_at.map(to_utc),
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PullSheetItemSummary {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub qty_requested: i32,
    pub qty_pulled: i32,
    pub qty_fulfilled: i32,
    pub prep_status: PrepStatus,
    pub notes: Option<String>,
}

impl From<pull_sheet_item::Model> for PullSheetItemSummary {
    fn from(model: pull_sheet_item::Model) -> Self {
        Self {
            id: model.id,
            inventory_item_id: model.inventory_item_id,
            item_name: model.item_name,
            qty_requested: model.qty_requested,
            qty_pulled: model.qty_pulled,
            qty_fulfilled: model.qty_fulfilled,
            prep_status: model.prep_status,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PullSheetDetail {
    #[serde(flatten)]
    pub sheet: PullSheetSummary,
    pub items: Vec<PullSheetItemSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePullSheetRequest {
    pub job_id: Uuid,
    pub scheduled_out_at: Option<DateTime<Utc>>,
    pub expected_return_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    pub inventory_item_id: Uuid,
    #[validate(range(min = 1, message = "qty_requested must be at least 1"))]
    pub qty_requested: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusTransitionRequest {
    pub status: PullSheetStatus,
}

pub async fn list_pull_sheets(
    State(state): State<AppState>,
    Query(query): Query<PullSheetListQuery>,
) -> ApiResult<PaginatedResponse<PullSheetSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state
        .pull_sheet_service()
        .list(page, limit, query.status)
        .await?;

    let items: Vec<PullSheetSummary> = records.into_iter().map(PullSheetSummary::from).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_pull_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PullSheetDetail> {
    match state.pull_sheet_service().get_with_items(id).await? {
        Some((sheet, items)) => Ok(Json(ApiResponse::success(PullSheetDetail {
            sheet: PullSheetSummary::from(sheet),
            items: items.into_iter().map(PullSheetItemSummary::from).collect(),
        }))),
        None => Err(ServiceError::NotFound(format!(
            "Pull sheet {} not found",
            id
        ))),
    }
}

pub async fn create_pull_sheet(
    State(state): State<AppState>,
    Json(payload): Json<CreatePullSheetRequest>,
) -> ApiResult<PullSheetSummary> {
    let input = CreatePullSheetInput {
        job_id: payload.job_id,
        scheduled_out_at: payload.scheduled_out_at.map(|dt| dt.naive_utc()),
        expected_return_at: payload.expected_return_at.map(|dt| dt.naive_utc()),
    };

    let created = state.pull_sheet_service().create(input).await?;
    Ok(Json(ApiResponse::success(PullSheetSummary::from(created))))
}

pub async fn add_pull_sheet_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> ApiResult<PullSheetItemSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let input = AddPullSheetItemInput {
        inventory_item_id: payload.inventory_item_id,
        qty_requested: payload.qty_requested,
    };

    let line = state.pull_sheet_service().add_item(id, input).await?;
    Ok(Json(ApiResponse::success(PullSheetItemSummary::from(line))))
}

pub async fn transition_pull_sheet_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusTransitionRequest>,
) -> ApiResult<PullSheetSummary> {
    let updated = state
        .pull_sheet_service()
        .transition_status(id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(PullSheetSummary::from(updated))))
}

pub async fn delete_pull_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.pull_sheet_service().delete(id).await?;
    Ok(Json(ApiResponse::success(json!({
        "pull_sheet_id": id,
        "status": "deleted"
    }))))
}

fn to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
}
