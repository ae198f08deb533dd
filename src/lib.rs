//! Rental Operations API Library
//!
//! Core functionality for the rental operations backend: warehouse pull
//! sheets, barcode scan reconciliation, substitutions, returns, and the
//! token ledger.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod services;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn inventory_service(&self) -> Arc<services::inventory::InventoryService> {
        self.services.inventory.clone()
    }

    pub fn pull_sheet_service(&self) -> Arc<services::pull_sheets::PullSheetService> {
        self.services.pull_sheets.clone()
    }

    pub fn scan_service(&self) -> Arc<services::scans::ScanService> {
        self.services.scans.clone()
    }

    pub fn substitution_service(&self) -> Arc<services::substitutions::SubstitutionService> {
        self.services.substitutions.clone()
    }

    pub fn return_service(&self) -> Arc<services::returns::ReturnService> {
        self.services.returns.clone()
    }

    pub fn token_service(&self) -> Arc<services::tokens::TokenService> {
        self.services.tokens.clone()
    }
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Versioned API surface.
pub fn api_v1_routes() -> Router<AppState> {
    let inventory = Router::new()
        .route(
            "/inventory",
            get(handlers::inventory::list_inventory)
                .post(handlers::inventory::create_inventory_item),
        )
        .route(
            "/inventory/barcode/:barcode",
            get(handlers::inventory::get_inventory_item_by_barcode),
        )
        .route("/inventory/:id", get(handlers::inventory::get_inventory_item));

    let pull_sheets = Router::new()
        .route(
            "/pull-sheets",
            get(handlers::pull_sheets::list_pull_sheets)
                .post(handlers::pull_sheets::create_pull_sheet),
        )
        .route(
            "/pull-sheets/:id",
            get(handlers::pull_sheets::get_pull_sheet),
        )
        .route(
            "/pull-sheets/:id",
            delete(handlers::pull_sheets::delete_pull_sheet),
        )
        .route(
            "/pull-sheets/:id/status",
            post(handlers::pull_sheets::transition_pull_sheet_status),
        )
        .route(
            "/pull-sheets/:id/items",
            post(handlers::pull_sheets::add_pull_sheet_item),
        );

    let scans = Router::new().route(
        "/pull-sheets/:id/scans",
        get(handlers::scans::list_scans).post(handlers::scans::record_scan),
    );

    let substitutions = Router::new()
        .route(
            "/pull-sheets/:id/substitutions",
            get(handlers::substitutions::list_substitutions),
        )
        .route(
            "/pull-sheets/:id/items/:item_id/substitutes",
            get(handlers::substitutions::list_substitute_candidates),
        )
        .route(
            "/pull-sheets/:id/items/:item_id/substitute",
            post(handlers::substitutions::substitute_pull_sheet_item),
        );

    let returns = Router::new()
        .route(
            "/pull-sheets/:id/return",
            post(handlers::returns::mark_pull_sheet_returned),
        )
        .route(
            "/returns/overdue",
            get(handlers::returns::list_overdue_returns),
        )
        .route(
            "/returns/warehouse",
            post(handlers::returns::record_warehouse_return),
        );

    let tokens = Router::new()
        .route("/tokens/:owner_id", get(handlers::tokens::get_token_account))
        .route("/tokens/:owner_id/credit", post(handlers::tokens::credit_tokens))
        .route("/tokens/:owner_id/deduct", post(handlers::tokens::deduct_tokens));

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(inventory)
        .merge(pull_sheets)
        .merge(scans)
        .merge(substitutions)
        .merge(returns)
        .merge(tokens)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "rentalops-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match db::ping(&state.db).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn success_response_includes_metadata() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));

        let meta = response.meta.expect("metadata expected");
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
