pub mod inventory;
pub mod pull_sheets;
pub mod returns;
pub mod scans;
pub mod substitutions;
pub mod tokens;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub pull_sheets: Arc<crate::services::pull_sheets::PullSheetService>,
    pub scans: Arc<crate::services::scans::ScanService>,
    pub substitutions: Arc<crate::services::substitutions::SubstitutionService>,
    pub returns: Arc<crate::services::returns::ReturnService>,
    pub tokens: Arc<crate::services::tokens::TokenService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            inventory: Arc::new(crate::services::inventory::InventoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            pull_sheets: Arc::new(crate::services::pull_sheets::PullSheetService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            scans: Arc::new(crate::services::scans::ScanService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            substitutions: Arc::new(crate::services::substitutions::SubstitutionService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            returns: Arc::new(crate::services::returns::ReturnService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            tokens: Arc::new(crate::services::tokens::TokenService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
