use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::pull_sheet_scan::ScanType;

/// Domain events emitted by the warehouse workflows.
///
/// Events describe things that already happened; handlers must not rely on
/// them for correctness of the originating write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Pull sheet lifecycle
    PullSheetCreated(Uuid),
    PullSheetStatusChanged {
        pull_sheet_id: Uuid,
        old_status: String,
        new_status: String,
    },
    PullSheetDeleted(Uuid),
    PullSheetReturned(Uuid),

    // Scan workflow
    ScanRecorded {
        pull_sheet_id: Uuid,
        pull_sheet_item_id: Uuid,
        inventory_item_id: Uuid,
        scan_type: ScanType,
        unit_tracked: bool,
    },
    DuplicateScanRejected {
        pull_sheet_item_id: Uuid,
        barcode: String,
    },

    // Substitutions
    ItemSubstituted {
        pull_sheet_item_id: Uuid,
        original_item_id: Uuid,
        substitute_item_id: Uuid,
    },

    // Warehouse stock
    WarehouseReturnRecorded {
        inventory_item_id: Uuid,
        quantity_delta: i32,
    },

    // Token ledger
    TokensCredited { account_id: Uuid, amount: i64 },
    TokensDebited { account_id: Uuid, amount: i64 },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background consumer for domain events.
///
/// Currently logs each event and bumps a counter; the channel is the seam a
/// webhook or queue publisher would plug into.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::DuplicateScanRejected {
                pull_sheet_item_id,
                barcode,
            } => {
                metrics::counter!("rentalops_scans_duplicate_rejected", 1);
                warn!(
                    pull_sheet_item_id = %pull_sheet_item_id,
                    barcode = %barcode,
                    "Duplicate scan rejected"
                );
            }
            Event::ScanRecorded {
                pull_sheet_id,
                scan_type,
                unit_tracked,
                ..
            } => {
                metrics::counter!("rentalops_scans_recorded", 1);
                info!(
                    pull_sheet_id = %pull_sheet_id,
                    scan_type = scan_type.as_str(),
                    unit_tracked = unit_tracked,
                    "Scan recorded"
                );
            }
            other => {
                metrics::counter!("rentalops_events_processed", 1);
                info!(event = ?other, "Event processed");
            }
        }
    }

    info!("Event channel closed; event processor exiting");
}
