use crate::{
    db::DbPool,
    entities::{
        inventory_item,
        pull_sheet::{self, Entity as PullSheet, PullSheetStatus},
        pull_sheet_item::{self, Entity as PullSheetItem, PrepStatus},
        pull_sheet_item_scan::{self, Entity as PullSheetItemScan},
        pull_sheet_scan::{self, Entity as PullSheetScan},
        substitution::{self, Entity as Substitution},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for creating a pull sheet for a job.
#[derive(Debug, Clone)]
pub struct CreatePullSheetInput {
    pub job_id: Uuid,
    pub scheduled_out_at: Option<NaiveDateTime>,
    pub expected_return_at: Option<NaiveDateTime>,
}

/// Input for an explicit line add.
#[derive(Debug, Clone)]
pub struct AddPullSheetItemInput {
    pub inventory_item_id: Uuid,
    pub qty_requested: i32,
}

/// Service for pull sheet lifecycle and manifest lines
#[derive(Clone)]
pub struct PullSheetService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PullSheetService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a pull sheet in `Draft` for the given job.
    #[instrument(skip(self, input), fields(job_id = %input.job_id))]
    pub async fn create(
        &self,
        input: CreatePullSheetInput,
    ) -> Result<pull_sheet::Model, ServiceError> {
        let db = &*self.db_pool;

        let now = Utc::now().naive_utc();
        let sheet = pull_sheet::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(input.job_id),
            status: Set(PullSheetStatus::Draft),
            scheduled_out_at: Set(input.scheduled_out_at),
            expected_return_at: Set(input.expected_return_at),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let sheet = sheet.insert(db).await?;

        self.event_sender
            .send(Event::PullSheetCreated(sheet.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(sheet)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<pull_sheet::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(PullSheet::find_by_id(id).one(db).await?)
    }

    /// Fetches a sheet together with its manifest lines.
    #[instrument(skip(self))]
    pub async fn get_with_items(
        &self,
        id: Uuid,
    ) -> Result<Option<(pull_sheet::Model, Vec<pull_sheet_item::Model>)>, ServiceError> {
        let db = &*self.db_pool;

        let Some(sheet) = PullSheet::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let items = PullSheetItem::find()
            .filter(pull_sheet_item::Column::PullSheetId.eq(id))
            .order_by_asc(pull_sheet_item::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(Some((sheet, items)))
    }

    /// Lists pull sheets with pagination and an optional status filter.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
        status: Option<PullSheetStatus>,
    ) -> Result<(Vec<pull_sheet::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = PullSheet::find().order_by_desc(pull_sheet::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(pull_sheet::Column::Status.eq(status));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await?;
        let sheets = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((sheets, total))
    }

    /// Explicit line add; the lazy path (first scan of an unseen barcode) lives
    /// in the scan command.
    #[instrument(skip(self, input))]
    pub async fn add_item(
        &self,
        pull_sheet_id: Uuid,
        input: AddPullSheetItemInput,
    ) -> Result<pull_sheet_item::Model, ServiceError> {
        if input.qty_requested < 1 {
            return Err(ServiceError::ValidationError(
                "qty_requested must be at least 1".to_string(),
            ));
        }

        let db = &*self.db_pool;

        PullSheet::find_by_id(pull_sheet_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Pull sheet {} not found", pull_sheet_id))
            })?;

        let item = inventory_item::Entity::find_by_id(input.inventory_item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Inventory item {} not found",
                    input.inventory_item_id
                ))
            })?;

        let now = Utc::now().naive_utc();
        let line = pull_sheet_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_sheet_id: Set(pull_sheet_id),
            inventory_item_id: Set(item.id),
            item_name: Set(item.name),
            qty_requested: Set(input.qty_requested),
            qty_pulled: Set(0),
            qty_fulfilled: Set(0),
            prep_status: Set(PrepStatus::Pending),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(line.insert(db).await?)
    }

    /// Applies a lifecycle transition, enforcing the declared transition table.
    #[instrument(skip(self))]
    pub async fn transition_status(
        &self,
        id: Uuid,
        next: PullSheetStatus,
    ) -> Result<pull_sheet::Model, ServiceError> {
        let db = &*self.db_pool;

        let sheet = PullSheet::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Pull sheet {} not found", id)))?;

        if !sheet.status.can_transition_to(next) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "{} -> {}",
                sheet.status, next
            )));
        }

        let old_status = sheet.status;
        let mut update: pull_sheet::ActiveModel = sheet.into();
        update.status = Set(next);
        update.updated_at = Set(Utc::now().naive_utc());
        let updated = update.update(db).await?;

        info!(old = %old_status, new = %next, "Pull sheet status changed");
        self.event_sender
            .send(Event::PullSheetStatusChanged {
                pull_sheet_id: id,
                old_status: old_status.as_str().to_string(),
                new_status: next.as_str().to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Permanent delete: removes the sheet and everything hanging off it
    /// (lines, unit scans, history scans, substitution audit rows).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        PullSheet::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Pull sheet {} not found", id)))?;

        let line_ids: Vec<Uuid> = PullSheetItem::find()
            .filter(pull_sheet_item::Column::PullSheetId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|line| line.id)
            .collect();

        let txn = db.begin().await?;

        if !line_ids.is_empty() {
            PullSheetItemScan::delete_many()
                .filter(pull_sheet_item_scan::Column::PullSheetItemId.is_in(line_ids.clone()))
                .exec(&txn)
                .await?;
        }
        PullSheetScan::delete_many()
            .filter(pull_sheet_scan::Column::PullSheetId.eq(id))
            .exec(&txn)
            .await?;
        Substitution::delete_many()
            .filter(substitution::Column::PullSheetId.eq(id))
            .exec(&txn)
            .await?;
        PullSheetItem::delete_many()
            .filter(pull_sheet_item::Column::PullSheetId.eq(id))
            .exec(&txn)
            .await?;
        PullSheet::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send(Event::PullSheetDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }
}
