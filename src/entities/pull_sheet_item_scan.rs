use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "void")]
    Void,
}

/// The `pull_sheet_item_scans` table.
///
/// Unit-level tracking rows, written only while the sheet is in active-pull
/// mode. An `active` row for a (line, barcode) pair is what makes a second
/// scan of the same physical unit a duplicate.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_sheet_item_scans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pull_sheet_item_id: Uuid,
    pub barcode: String,
    pub scan_status: ScanStatus,
    pub scanned_by: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
