use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        inventory_movement::{self, MovementType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// General warehouse return: a scan at the return desk puts one unit back on
/// the shelf, independent of any pull sheet. A movement-log row records the
/// change; pull-sheet counters are deliberately untouched.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordWarehouseReturnCommand {
    #[validate(length(min = 1, message = "Barcode cannot be empty"))]
    pub barcode: String,

    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordWarehouseReturnResult {
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub quantity_on_hand: i32,
}

#[async_trait::async_trait]
impl Command for RecordWarehouseReturnCommand {
    type Result = RecordWarehouseReturnResult;

    #[instrument(skip(self, db_pool, event_sender), fields(barcode = %self.barcode))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();

        let item = InventoryItem::find()
            .filter(inventory_item::Column::Barcode.eq(self.barcode.clone()))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Barcode {} not recognized", self.barcode))
            })?;

        let txn = db.begin().await?;

        InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::QuantityOnHand,
                Expr::col(inventory_item::Column::QuantityOnHand).add(1),
            )
            .col_expr(
                inventory_item::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(inventory_item::Column::Id.eq(item.id))
            .exec(&txn)
            .await?;

        let movement = inventory_movement::ActiveModel {
            id: Set(Uuid::new_v4()),
            inventory_item_id: Set(item.id),
            movement_type: Set(MovementType::WarehouseReturn),
            quantity_delta: Set(1),
            notes: Set(self.notes.clone()),
            created_at: Set(Utc::now().naive_utc()),
        };
        movement.insert(&txn).await?;

        let refreshed = InventoryItem::find_by_id(item.id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Inventory item {} vanished mid-return", item.id))
            })?;

        txn.commit().await?;

        info!(item = %refreshed.name, quantity_on_hand = refreshed.quantity_on_hand, "Warehouse return recorded");
        event_sender
            .send(Event::WarehouseReturnRecorded {
                inventory_item_id: refreshed.id,
                quantity_delta: 1,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(RecordWarehouseReturnResult {
            inventory_item_id: refreshed.id,
            item_name: refreshed.name,
            quantity_on_hand: refreshed.quantity_on_hand,
        })
    }
}
