use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `inventory_items` table.
///
/// One row per physical-or-logical unit of rentable gear; the barcode is the
/// logical key a scan resolves against.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    /// Daily rental rate; informational, not used by the scan workflow.
    pub daily_rate: Option<Decimal>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
