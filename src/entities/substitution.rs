use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `substitutions` table.
///
/// Append-only audit trail of item swaps. The live `pull_sheet_items` row is
/// repointed in the same transaction that inserts one of these.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "substitutions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pull_sheet_id: Uuid,
    pub pull_sheet_item_id: Uuid,
    pub original_item_id: Uuid,
    pub original_item_name: String,
    pub substitute_item_id: Uuid,
    pub substitute_item_name: String,
    pub reason: String,
    pub qty_affected: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
