use crate::{
    commands::scans::{RecordScanCommand, RecordScanResult},
    commands::Command,
    db::DbPool,
    entities::pull_sheet_scan::{self, Entity as PullSheetScan},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for scan ingestion and scan history
#[derive(Clone)]
pub struct ScanService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ScanService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Runs one scan through the reconciliation workflow.
    #[instrument(skip(self, command))]
    pub async fn record_scan(
        &self,
        command: RecordScanCommand,
    ) -> Result<RecordScanResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Lists the append-only scan history for a sheet, newest first.
    #[instrument(skip(self))]
    pub async fn list_scans(
        &self,
        pull_sheet_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<pull_sheet_scan::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = PullSheetScan::find()
            .filter(pull_sheet_scan::Column::PullSheetId.eq(pull_sheet_id))
            .order_by_desc(pull_sheet_scan::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await?;
        let scans = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((scans, total))
    }
}
