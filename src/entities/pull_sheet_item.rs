use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Warehouse prep progress for a single line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PrepStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "complete")]
    Complete,
}

impl PrepStatus {
    /// Progress derived from the pulled counter against the requested
    /// quantity.
    pub fn from_counts(qty_pulled: i32, qty_requested: i32) -> Self {
        if qty_pulled <= 0 {
            Self::Pending
        } else if qty_pulled >= qty_requested {
            Self::Complete
        } else {
            Self::InProgress
        }
    }
}

/// The `pull_sheet_items` table.
///
/// A requested-quantity line against one catalog entry. Created by an explicit
/// add or lazily by the first scan of an unseen barcode. A substitution
/// repoints `inventory_item_id` in place, so the (sheet, item) pairing is not
/// unique after one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_sheet_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pull_sheet_id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub qty_requested: i32,
    pub qty_pulled: i32,
    pub qty_fulfilled: i32,
    pub prep_status: PrepStatus,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
