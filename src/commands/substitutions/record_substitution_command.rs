use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        inventory_item,
        pull_sheet_item::{self, Entity as PullSheetItem},
        substitution,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Swaps which catalog entry a pull-sheet line points at.
///
/// The audit row and the live-line update are one transaction; the trail and
/// the live state cannot diverge.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordSubstitutionCommand {
    pub pull_sheet_id: Uuid,
    pub pull_sheet_item_id: Uuid,
    pub substitute_item_id: Uuid,

    #[validate(length(min = 1, message = "Reason cannot be empty"))]
    pub reason: String,

    pub qty_affected: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordSubstitutionResult {
    pub substitution_id: Uuid,
    pub pull_sheet_item_id: Uuid,
    pub original_item_id: Uuid,
    pub original_item_name: String,
    pub substitute_item_id: Uuid,
    pub substitute_item_name: String,
}

#[async_trait::async_trait]
impl Command for RecordSubstitutionCommand {
    type Result = RecordSubstitutionResult;

    #[instrument(skip(self, db_pool, event_sender), fields(pull_sheet_item_id = %self.pull_sheet_item_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let qty_affected = self.qty_affected.unwrap_or(1);
        if qty_affected < 1 {
            return Err(ServiceError::ValidationError(
                "qty_affected must be at least 1".to_string(),
            ));
        }

        let db = db_pool.as_ref();

        let line = PullSheetItem::find_by_id(self.pull_sheet_item_id)
            .filter(pull_sheet_item::Column::PullSheetId.eq(self.pull_sheet_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Pull sheet item {} not found on sheet {}",
                    self.pull_sheet_item_id, self.pull_sheet_id
                ))
            })?;

        let substitute = inventory_item::Entity::find_by_id(self.substitute_item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Inventory item {} not found",
                    self.substitute_item_id
                ))
            })?;

        if substitute.id == line.inventory_item_id {
            return Err(ServiceError::InvalidOperation(
                "Substitute matches the current item".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let substitution_id = Uuid::new_v4();

        let txn = db.begin().await?;

        let audit = substitution::ActiveModel {
            id: Set(substitution_id),
            pull_sheet_id: Set(self.pull_sheet_id),
            pull_sheet_item_id: Set(line.id),
            original_item_id: Set(line.inventory_item_id),
            original_item_name: Set(line.item_name.clone()),
            substitute_item_id: Set(substitute.id),
            substitute_item_name: Set(substitute.name.clone()),
            reason: Set(self.reason.clone()),
            qty_affected: Set(qty_affected),
            created_at: Set(now),
        };
        audit.insert(&txn).await?;

        let substitution_note = format!(
            "Substituted {} -> {}: {}",
            line.item_name, substitute.name, self.reason
        );
        let notes = match &line.notes {
            Some(existing) => format!("{}\n{}", existing, substitution_note),
            None => substitution_note,
        };

        let mut update: pull_sheet_item::ActiveModel = line.clone().into();
        update.inventory_item_id = Set(substitute.id);
        update.item_name = Set(substitute.name.clone());
        update.notes = Set(Some(notes));
        update.updated_at = Set(now);
        update.update(&txn).await?;

        txn.commit().await?;

        info!(
            original = %line.item_name,
            substitute = %substitute.name,
            reason = %self.reason,
            "Substitution recorded"
        );
        event_sender
            .send(Event::ItemSubstituted {
                pull_sheet_item_id: line.id,
                original_item_id: line.inventory_item_id,
                substitute_item_id: substitute.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(RecordSubstitutionResult {
            substitution_id,
            pull_sheet_item_id: line.id,
            original_item_id: line.inventory_item_id,
            original_item_name: line.item_name,
            substitute_item_id: substitute.id,
            substitute_item_name: substitute.name,
        })
    }
}
