use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// What a scan was for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    #[sea_orm(string_value = "pull")]
    Pull,
    #[sea_orm(string_value = "return")]
    Return,
    #[sea_orm(string_value = "verify")]
    Verify,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Return => "return",
            Self::Verify => "verify",
        }
    }
}

/// The `pull_sheet_scans` table.
///
/// Append-only scan history, written for every accepted scan regardless of
/// sheet mode. Deleted only by the whole-sheet cascade delete.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_sheet_scans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pull_sheet_id: Uuid,
    pub pull_sheet_item_id: Option<Uuid>,
    pub inventory_item_id: Uuid,
    pub scan_type: ScanType,
    pub scanned_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
