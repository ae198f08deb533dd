use crate::{
    db::DbPool,
    entities::inventory_item::{self, Entity as InventoryItem},
    errors::ServiceError,
    events::EventSender,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct CreateInventoryItemInput {
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    pub daily_rate: Option<Decimal>,
}

/// Service for the inventory catalog
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    #[allow(dead_code)]
    event_sender: Arc<EventSender>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a catalog entry; the barcode must be unused.
    #[instrument(skip(self, input), fields(barcode = %input.barcode))]
    pub async fn create_item(
        &self,
        input: CreateInventoryItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = InventoryItem::find()
            .filter(inventory_item::Column::Barcode.eq(input.barcode.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Barcode {} already exists",
                input.barcode
            )));
        }

        let now = Utc::now().naive_utc();
        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            barcode: Set(input.barcode),
            name: Set(input.name),
            category: Set(input.category),
            location: Set(input.location),
            quantity_on_hand: Set(input.quantity_on_hand),
            daily_rate: Set(input.daily_rate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(item.insert(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> Result<Option<inventory_item::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(InventoryItem::find_by_id(id).one(db).await?)
    }

    /// Exact-match barcode resolution, the same lookup the scan path uses.
    #[instrument(skip(self))]
    pub async fn get_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(InventoryItem::find()
            .filter(inventory_item::Column::Barcode.eq(barcode))
            .one(db)
            .await?)
    }

    /// Lists catalog entries with pagination; `q` searches name and barcode,
    /// `category` filters exactly.
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        page: u64,
        limit: u64,
        q: Option<&str>,
        category: Option<&str>,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = InventoryItem::find().order_by_asc(inventory_item::Column::Name);
        if let Some(q) = q {
            let pattern = format!("%{}%", q);
            query = query.filter(
                Condition::any()
                    .add(inventory_item::Column::Name.like(pattern.clone()))
                    .add(inventory_item::Column::Barcode.like(pattern)),
            );
        }
        if let Some(category) = category {
            query = query.filter(inventory_item::Column::Category.eq(category));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }
}
