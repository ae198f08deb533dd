use crate::{
    entities::inventory_item,
    errors::ServiceError,
    services::inventory::CreateInventoryItemInput,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct InventoryListQuery {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub limit: Option<u64>,
    /// Name/barcode search
    pub q: Option<String>,
    /// Exact category filter
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryItemSummary {
    pub id: Uuid,
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    pub daily_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_item::Model> for InventoryItemSummary {
    fn from(model: inventory_item::Model) -> Self {
        Self {
            id: model.id,
            barcode: model.barcode,
            name: model.name,
            category: model.category,
            location: model.location,
            quantity_on_hand: model.quantity_on_hand,
            daily_rate: model.daily_rate,
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, message = "Barcode cannot be empty"))]
    pub barcode: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: String,
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_on_hand: Option<i32>,
    pub daily_rate: Option<Decimal>,
}

pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> ApiResult<PaginatedResponse<InventoryItemSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state
        .inventory_service()
        .list_items(page, limit, query.q.as_deref(), query.category.as_deref())
        .await?;

    let items: Vec<InventoryItemSummary> =
        records.into_iter().map(InventoryItemSummary::from).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<InventoryItemSummary> {
    match state.inventory_service().get_item(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(InventoryItemSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Inventory item {} not found",
            id
        ))),
    }
}

pub async fn get_inventory_item_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> ApiResult<InventoryItemSummary> {
    match state.inventory_service().get_by_barcode(&barcode).await? {
        Some(model) => Ok(Json(ApiResponse::success(InventoryItemSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Barcode {} not recognized",
            barcode
        ))),
    }
}

pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> ApiResult<InventoryItemSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let input = CreateInventoryItemInput {
        barcode: payload.barcode,
        name: payload.name,
        category: payload.category,
        location: payload.location,
        quantity_on_hand: payload.quantity_on_hand.unwrap_or(0),
        daily_rate: payload.daily_rate,
    };

    let created = state.inventory_service().create_item(input).await?;
    Ok(Json(ApiResponse::success(InventoryItemSummary::from(created))))
}

fn to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
}
