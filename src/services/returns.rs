use crate::{
    commands::returns::{RecordWarehouseReturnCommand, RecordWarehouseReturnResult},
    commands::Command,
    db::DbPool,
    entities::pull_sheet::{self, Entity as PullSheet, PullSheetStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for return manifests and the general warehouse return desk
#[derive(Clone)]
pub struct ReturnService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReturnService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Finalized sheets whose expected return is strictly in the past.
    #[instrument(skip(self))]
    pub async fn list_overdue(&self) -> Result<Vec<pull_sheet::Model>, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now().naive_utc();

        Ok(PullSheet::find()
            .filter(pull_sheet::Column::Status.eq(PullSheetStatus::Finalized))
            .filter(pull_sheet::Column::ExpectedReturnAt.lt(now))
            .order_by_asc(pull_sheet::Column::ExpectedReturnAt)
            .all(db)
            .await?)
    }

    /// Marks a finalized sheet returned, removing it from overdue queries.
    #[instrument(skip(self))]
    pub async fn mark_returned(&self, id: Uuid) -> Result<pull_sheet::Model, ServiceError> {
        let db = &*self.db_pool;

        let sheet = PullSheet::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Pull sheet {} not found", id)))?;

        if !sheet.status.can_transition_to(PullSheetStatus::Returned) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "{} -> returned",
                sheet.status
            )));
        }

        let mut update: pull_sheet::ActiveModel = sheet.into();
        update.status = Set(PullSheetStatus::Returned);
        update.updated_at = Set(Utc::now().naive_utc());
        let updated = update.update(db).await?;

        info!(pull_sheet_id = %id, "Pull sheet marked returned");
        self.event_sender
            .send(Event::PullSheetReturned(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// General warehouse return scan; independent of any pull sheet.
    #[instrument(skip(self, command))]
    pub async fn record_warehouse_return(
        &self,
        command: RecordWarehouseReturnCommand,
    ) -> Result<RecordWarehouseReturnResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }
}
