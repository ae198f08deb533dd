use crate::{
    db::DbPool,
    entities::{
        token_account::{self, Entity as TokenAccount},
        token_transaction::{self, TokenTransactionKind},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for the token ledger
///
/// Balance changes go through conditional updates; the balance can never be
/// driven negative, and the ledger only records changes that happened.
#[derive(Clone)]
pub struct TokenService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl TokenService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_account(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<token_account::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(TokenAccount::find()
            .filter(token_account::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?)
    }

    /// Credits an owner's account, creating it on first use.
    #[instrument(skip(self))]
    pub async fn credit(
        &self,
        owner_id: Uuid,
        amount: i64,
        reason: Option<String>,
    ) -> Result<token_account::Model, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now().naive_utc();

        let account = match self.get_account(owner_id).await? {
            Some(account) => account,
            None => {
                let account = token_account::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    owner_id: Set(owner_id),
                    balance: Set(0),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                account.insert(db).await?
            }
        };

        let txn = db.begin().await?;

        TokenAccount::update_many()
            .col_expr(
                token_account::Column::Balance,
                Expr::col(token_account::Column::Balance).add(amount),
            )
            .col_expr(token_account::Column::UpdatedAt, Expr::value(now))
            .filter(token_account::Column::Id.eq(account.id))
            .exec(&txn)
            .await?;

        self.append_ledger(&txn, account.id, TokenTransactionKind::Credit, amount, reason)
            .await?;

        let refreshed = TokenAccount::find_by_id(account.id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Token account {} vanished", account.id))
            })?;

        txn.commit().await?;

        self.event_sender
            .send(Event::TokensCredited {
                account_id: account.id,
                amount,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(refreshed)
    }

    /// Deducts from an owner's balance.
    ///
    /// The guard lives in the UPDATE itself: zero affected rows means the
    /// balance was short, and neither the balance nor the ledger changes.
    #[instrument(skip(self))]
    pub async fn deduct(
        &self,
        owner_id: Uuid,
        amount: i64,
        reason: Option<String>,
    ) -> Result<token_account::Model, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let account = self.get_account(owner_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Token account for owner {} not found", owner_id))
        })?;

        let txn = db.begin().await?;

        let result = TokenAccount::update_many()
            .col_expr(
                token_account::Column::Balance,
                Expr::col(token_account::Column::Balance).sub(amount),
            )
            .col_expr(
                token_account::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(token_account::Column::Id.eq(account.id))
            .filter(token_account::Column::Balance.gte(amount))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InsufficientTokens(format!(
                "requested {} tokens, balance is {}",
                amount, account.balance
            )));
        }

        self.append_ledger(&txn, account.id, TokenTransactionKind::Debit, amount, reason)
            .await?;

        let refreshed = TokenAccount::find_by_id(account.id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("Token account {} vanished", account.id))
            })?;

        txn.commit().await?;

        info!(account_id = %account.id, amount, balance = refreshed.balance, "Tokens deducted");
        self.event_sender
            .send(Event::TokensDebited {
                account_id: account.id,
                amount,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(refreshed)
    }

    async fn append_ledger<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
        kind: TokenTransactionKind,
        amount: i64,
        reason: Option<String>,
    ) -> Result<(), ServiceError> {
        let row = token_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            kind: Set(kind),
            amount: Set(amount),
            reason: Set(reason),
            created_at: Set(Utc::now().naive_utc()),
        };
        row.insert(conn).await?;
        Ok(())
    }
}
