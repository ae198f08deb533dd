use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        inventory_item,
        pull_sheet::{self, Entity as PullSheet},
        pull_sheet_item::{self, Entity as PullSheetItem, PrepStatus},
        pull_sheet_item_scan::{self, Entity as PullSheetItemScan, ScanStatus},
        pull_sheet_scan::{self, ScanType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Ingests one barcode scan against a pull sheet.
///
/// Resolution, line creation, duplicate enforcement and the pulled-counter
/// increment all happen inside a single transaction; a rejected scan leaves
/// no rows behind.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordScanCommand {
    pub pull_sheet_id: Uuid,

    #[validate(length(min = 1, message = "Barcode cannot be empty"))]
    pub barcode: String,

    pub scan_type: ScanType,
    pub scanned_by: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordScanResult {
    pub pull_sheet_item_id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub qty_pulled: i32,
    /// Whether this scan was unit-tracked (active-pull mode).
    pub unit_tracked: bool,
}

#[async_trait::async_trait]
impl Command for RecordScanCommand {
    type Result = RecordScanResult;

    #[instrument(skip(self, db_pool, event_sender), fields(pull_sheet_id = %self.pull_sheet_id, barcode = %self.barcode))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        let outcome = self.apply(db).await;

        match &outcome {
            Ok(result) => {
                metrics::counter!("rentalops_scan_commands_total", 1);
                info!(
                    item = %result.item_name,
                    qty_pulled = result.qty_pulled,
                    unit_tracked = result.unit_tracked,
                    "Scan accepted"
                );
                event_sender
                    .send(Event::ScanRecorded {
                        pull_sheet_id: self.pull_sheet_id,
                        pull_sheet_item_id: result.pull_sheet_item_id,
                        inventory_item_id: result.inventory_item_id,
                        scan_type: self.scan_type,
                        unit_tracked: result.unit_tracked,
                    })
                    .await
                    .map_err(ServiceError::EventError)?;
            }
            Err(ServiceError::DuplicateScan {
                pull_sheet_item_id,
                barcode,
            }) => {
                // Best-effort notification; the rejection itself already stands.
                if let Err(e) = event_sender
                    .send(Event::DuplicateScanRejected {
                        pull_sheet_item_id: *pull_sheet_item_id,
                        barcode: barcode.clone(),
                    })
                    .await
                {
                    warn!("Failed to publish duplicate-scan event: {}", e);
                }
            }
            Err(e) => {
                error!("Scan ingestion failed: {}", e);
            }
        }

        outcome
    }
}

impl RecordScanCommand {
    async fn apply(&self, db: &DbPool) -> Result<RecordScanResult, ServiceError> {
        let sheet = PullSheet::find_by_id(self.pull_sheet_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Pull sheet {} not found", self.pull_sheet_id))
            })?;

        // Catalog resolution happens before anything is written; an unknown
        // barcode must have no side effects.
        let item = inventory_item::Entity::find()
            .filter(inventory_item::Column::Barcode.eq(self.barcode.clone()))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Barcode {} not recognized", self.barcode))
            })?;

        let active_pull =
            self.scan_type == ScanType::Pull && sheet.status.unit_tracking_enabled();

        let txn = db.begin().await?;

        let line = self.resolve_or_create_line(&txn, &item).await?;

        if active_pull {
            let duplicate = PullSheetItemScan::find()
                .filter(pull_sheet_item_scan::Column::PullSheetItemId.eq(line.id))
                .filter(pull_sheet_item_scan::Column::Barcode.eq(self.barcode.clone()))
                .filter(pull_sheet_item_scan::Column::ScanStatus.eq(ScanStatus::Active))
                .one(&txn)
                .await?;

            if duplicate.is_some() {
                // Dropping the transaction rolls back the lazily created line.
                return Err(ServiceError::DuplicateScan {
                    pull_sheet_item_id: line.id,
                    barcode: self.barcode.clone(),
                });
            }

            self.insert_unit_scan(&txn, line.id).await?;
            self.insert_history_scan(&txn, Some(line.id), item.id).await?;

            let qty_pulled = self.increment_pulled_counter(&txn, &line).await?;

            txn.commit().await?;

            return Ok(RecordScanResult {
                pull_sheet_item_id: line.id,
                inventory_item_id: item.id,
                item_name: item.name,
                qty_pulled,
                unit_tracked: true,
            });
        }

        // Draft/create, return and verify scans keep the history trail but skip
        // duplicate enforcement and the pulled counter.
        self.insert_history_scan(&txn, Some(line.id), item.id).await?;
        txn.commit().await?;

        Ok(RecordScanResult {
            pull_sheet_item_id: line.id,
            inventory_item_id: item.id,
            item_name: item.name,
            qty_pulled: line.qty_pulled,
            unit_tracked: false,
        })
    }

    /// Finds the line for (sheet, catalog item), creating it with a requested
    /// quantity of 1 on the first scan of an unseen barcode. Substitutions can
    /// leave multiple lines pointing at the same catalog item; the oldest wins.
    async fn resolve_or_create_line<C: ConnectionTrait>(
        &self,
        conn: &C,
        item: &inventory_item::Model,
    ) -> Result<pull_sheet_item::Model, ServiceError> {
        let existing = PullSheetItem::find()
            .filter(pull_sheet_item::Column::PullSheetId.eq(self.pull_sheet_id))
            .filter(pull_sheet_item::Column::InventoryItemId.eq(item.id))
            .order_by_asc(pull_sheet_item::Column::CreatedAt)
            .one(conn)
            .await?;

        if let Some(line) = existing {
            return Ok(line);
        }

        let now = Utc::now().naive_utc();
        let line = pull_sheet_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_sheet_id: Set(self.pull_sheet_id),
            inventory_item_id: Set(item.id),
            item_name: Set(item.name.clone()),
            qty_requested: Set(1),
            qty_pulled: Set(0),
            qty_fulfilled: Set(0),
            prep_status: Set(PrepStatus::Pending),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(line.insert(conn).await?)
    }

    async fn insert_unit_scan<C: ConnectionTrait>(
        &self,
        conn: &C,
        pull_sheet_item_id: Uuid,
    ) -> Result<(), ServiceError> {
        let scan = pull_sheet_item_scan::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_sheet_item_id: Set(pull_sheet_item_id),
            barcode: Set(self.barcode.clone()),
            scan_status: Set(ScanStatus::Active),
            scanned_by: Set(self.scanned_by.clone()),
            created_at: Set(Utc::now().naive_utc()),
        };
        scan.insert(conn).await?;
        Ok(())
    }

    async fn insert_history_scan<C: ConnectionTrait>(
        &self,
        conn: &C,
        pull_sheet_item_id: Option<Uuid>,
        inventory_item_id: Uuid,
    ) -> Result<(), ServiceError> {
        let scan = pull_sheet_scan::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_sheet_id: Set(self.pull_sheet_id),
            pull_sheet_item_id: Set(pull_sheet_item_id),
            inventory_item_id: Set(inventory_item_id),
            scan_type: Set(self.scan_type),
            scanned_by: Set(self.scanned_by.clone()),
            notes: Set(self.notes.clone()),
            created_at: Set(Utc::now().naive_utc()),
        };
        scan.insert(conn).await?;
        Ok(())
    }

    /// Increments `qty_pulled` as a database-side expression and refreshes the
    /// prep status from the committed counter.
    async fn increment_pulled_counter<C: ConnectionTrait>(
        &self,
        conn: &C,
        line: &pull_sheet_item::Model,
    ) -> Result<i32, ServiceError> {
        PullSheetItem::update_many()
            .col_expr(
                pull_sheet_item::Column::QtyPulled,
                Expr::col(pull_sheet_item::Column::QtyPulled).add(1),
            )
            .filter(pull_sheet_item::Column::Id.eq(line.id))
            .exec(conn)
            .await?;

        let refreshed = PullSheetItem::find_by_id(line.id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Pull sheet line {} vanished mid-scan", line.id))
            })?;

        let mut update: pull_sheet_item::ActiveModel = refreshed.clone().into();
        update.prep_status = Set(PrepStatus::from_counts(
            refreshed.qty_pulled,
            refreshed.qty_requested,
        ));
        update.updated_at = Set(Utc::now().naive_utc());
        update.update(conn).await?;

        Ok(refreshed.qty_pulled)
    }
}
