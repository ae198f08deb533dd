use crate::{
    commands::scans::RecordScanCommand,
    entities::pull_sheet_scan::{self, ScanType},
    errors::ServiceError,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
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

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordScanRequest {
    #[validate(length(min = 1, message = "Barcode cannot be empty"))]
    pub barcode: String,
    /// Defaults to a pull scan when omitted.
    pub scan_type: Option<ScanType>,
    pub scanned_by: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanOutcome {
    pub pull_sheet_item_id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub qty_pulled: i32,
    pub unit_tracked: bool,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ScanListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanHistoryEntry {
    pub id: Uuid,
    pub pull_sheet_item_id: Option<Uuid>,
    pub inventory_item_id: Uuid,
    pub scan_type: ScanType,
    pub scanned_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pull_sheet_scan::Model> for ScanHistoryEntry {
    fn from(model: pull_sheet_scan::Model) -> Self {
        Self {
            id: model.id,
            pull_sheet_item_id: model.pull_sheet_item_id,
            inventory_item_id: model.inventory_item_id,
            scan_type: model.scan_type,
            scanned_by: model.scanned_by,
            notes: model.notes,
            created_at: to_utc(model.created_at),
        }
    }
}

pub async fn record_scan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordScanRequest>,
) -> ApiResult<ScanOutcome> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let command = RecordScanCommand {
        pull_sheet_id: id,
        barcode: payload.barcode,
        scan_type: payload.scan_type.unwrap_or(ScanType::Pull),
        scanned_by: payload.scanned_by,
        notes: payload.notes,
    };

    let result = state.scan_service().record_scan(command).await?;
    Ok(Json(ApiResponse::success(ScanOutcome {
        pull_sheet_item_id: result.pull_sheet_item_id,
        inventory_item_id: result.inventory_item_id,
        item_name: result.item_name,
        qty_pulled: result.qty_pulled,
        unit_tracked: result.unit_tracked,
    })))
}

pub async fn list_scans(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ScanListQuery>,
) -> ApiResult<PaginatedResponse<ScanHistoryEntry>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let (records, total) = state.scan_service().list_scans(id, page, limit).await?;

    let items: Vec<ScanHistoryEntry> = records.into_iter().map(ScanHistoryEntry::from).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

fn to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
}
