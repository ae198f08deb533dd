use crate::{
    commands::substitutions::{RecordSubstitutionCommand, RecordSubstitutionResult},
    commands::Command,
    db::DbPool,
    entities::{
        inventory_item::{self, Entity as InventoryItem},
        pull_sheet_item::{self, Entity as PullSheetItem},
        substitution::{self, Entity as Substitution},
    },
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

const CANDIDATE_LIMIT: u64 = 50;

/// Service for pull-sheet item substitutions
#[derive(Clone)]
pub struct SubstitutionService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SubstitutionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Candidate replacements for a line: same category as the current item by
    /// default, or a name/barcode search when a query string is given. The
    /// current item itself is excluded.
    #[instrument(skip(self))]
    pub async fn list_candidates(
        &self,
        pull_sheet_id: Uuid,
        pull_sheet_item_id: Uuid,
        q: Option<&str>,
    ) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let db = &*self.db_pool;

        let line = PullSheetItem::find_by_id(pull_sheet_item_id)
            .filter(pull_sheet_item::Column::PullSheetId.eq(pull_sheet_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Pull sheet item {} not found on sheet {}",
                    pull_sheet_item_id, pull_sheet_id
                ))
            })?;

        let current = InventoryItem::find_by_id(line.inventory_item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Inventory item {} not found",
                    line.inventory_item_id
                ))
            })?;

        let mut query = InventoryItem::find()
            .filter(inventory_item::Column::Id.ne(current.id))
            .order_by_asc(inventory_item::Column::Name)
            .limit(CANDIDATE_LIMIT);

        query = match q {
            Some(q) if !q.is_empty() => {
                let pattern = format!("%{}%", q);
                query.filter(
                    Condition::any()
                        .add(inventory_item::Column::Name.like(pattern.clone()))
                        .add(inventory_item::Column::Barcode.like(pattern)),
                )
            }
            _ => query.filter(inventory_item::Column::Category.eq(current.category)),
        };

        Ok(query.all(db).await?)
    }

    /// Records a substitution: one audit row plus the live-line repoint.
    #[instrument(skip(self, command))]
    pub async fn record_substitution(
        &self,
        command: RecordSubstitutionCommand,
    ) -> Result<RecordSubstitutionResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Lists the substitution audit trail for a sheet, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_sheet(
        &self,
        pull_sheet_id: Uuid,
    ) -> Result<Vec<substitution::Model>, ServiceError> {
        let db = &*self.db_pool;

        Ok(Substitution::find()
            .filter(substitution::Column::PullSheetId.eq(pull_sheet_id))
            .order_by_desc(substitution::Column::CreatedAt)
            .all(db)
            .await?)
    }
}
