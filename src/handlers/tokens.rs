use crate::{
    entities::token_account,
    errors::ServiceError,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenAccountSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<token_account::Model> for TokenAccountSummary {
    fn from(model: token_account::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            balance: model.balance,
            updated_at: to_utc(model.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenAmountRequest {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
    pub reason: Option<String>,
}

pub async fn get_token_account(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> ApiResult<TokenAccountSummary> {
    match state.token_service().get_account(owner_id).await? {
        Some(model) => Ok(Json(ApiResponse::success(TokenAccountSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!(
            "Token account for owner {} not found",
            owner_id
        ))),
    }
}

pub async fn credit_tokens(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    Json(payload): Json<TokenAmountRequest>,
) -> ApiResult<TokenAccountSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let account = state
        .token_service()
        .credit(owner_id, payload.amount, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(TokenAccountSummary::from(account))))
}

pub async fn deduct_tokens(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    Json(payload): Json<TokenAmountRequest>,
) -> ApiResult<TokenAccountSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let account = state
        .token_service()
        .deduct(owner_id, payload.amount, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(TokenAccountSummary::from(account))))
}

fn to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)
}
