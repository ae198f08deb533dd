use crate::{db::DbPool, errors::ServiceError, events::EventSender};
use std::sync::Arc;

pub mod returns;
pub mod scans;
pub mod substitutions;

/// A self-contained, multi-write workflow.
///
/// Commands own their transaction boundaries and emit domain events after the
/// writes commit.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    type Result: Send + Sync;

    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError>;
}
