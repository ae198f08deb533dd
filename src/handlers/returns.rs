use crate::{
    commands::returns::RecordWarehouseReturnCommand,
    errors::ServiceError,
    handlers::pull_sheets::PullSheetSummary,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WarehouseReturnRequest {
    #[validate(length(min = 1, message = "Barcode cannot be empty"))]
    pub barcode: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WarehouseReturnOutcome {
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub quantity_on_hand: i32,
}

/// Finalized sheets past their expected return time.
pub async fn list_overdue_returns(
    State(state): State<AppState>,
) -> ApiResult<Vec<PullSheetSummary>> {
    let records = state.return_service().list_overdue().await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(PullSheetSummary::from).collect(),
    )))
}

pub async fn mark_pull_sheet_returned(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PullSheetSummary> {
    let updated = state.return_service().mark_returned(id).await?;
    Ok(Json(ApiResponse::success(PullSheetSummary::from(updated))))
}

/// Return-desk scan: restocks one unit of whatever barcode was scanned.
pub async fn record_warehouse_return(
    State(state): State<AppState>,
    Json(payload): Json<WarehouseReturnRequest>,
) -> ApiResult<WarehouseReturnOutcome> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let command = RecordWarehouseReturnCommand {
        barcode: payload.barcode,
        notes: payload.notes,
    };

    let result = state
        .return_service()
        .record_warehouse_return(command)
        .await?;

    Ok(Json(ApiResponse::success(WarehouseReturnOutcome {
        inventory_item_id: result.inventory_item_id,
        item_name: result.item_name,
        quantity_on_hand: result.quantity_on_hand,
    })))
}
