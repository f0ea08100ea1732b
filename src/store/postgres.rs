use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{chat_queries, portfolio_entry_queries, tracked_coin_queries};
use crate::errors::StoreError;
use crate::models::{ChatTurn, PortfolioEntry, TrackedCoin};
use crate::store::{already_tracked, ConversationStore, PortfolioStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn list_entries(&self, user_id: Uuid) -> Result<Vec<PortfolioEntry>, StoreError> {
        Ok(portfolio_entry_queries::fetch_for_user(&self.pool, user_id).await?)
    }

    async fn create_entry(&self, entry: PortfolioEntry) -> Result<PortfolioEntry, StoreError> {
        Ok(portfolio_entry_queries::insert(&self.pool, entry).await?)
    }

    async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<u64, StoreError> {
        Ok(portfolio_entry_queries::delete(&self.pool, user_id, id).await?)
    }

    async fn list_tracked_coins(&self, user_id: Uuid) -> Result<Vec<TrackedCoin>, StoreError> {
        Ok(tracked_coin_queries::fetch_for_user(&self.pool, user_id).await?)
    }

    async fn add_tracked_coin(&self, coin: TrackedCoin) -> Result<TrackedCoin, StoreError> {
        let coin_id = coin.coin_id.clone();
        match tracked_coin_queries::insert(&self.pool, coin).await {
            Ok(coin) => Ok(coin),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(already_tracked(&coin_id))
            }
            Err(e) => Err(StoreError::Db(e)),
        }
    }

    async fn remove_tracked_coin(&self, user_id: Uuid, coin_id: &str) -> Result<u64, StoreError> {
        Ok(tracked_coin_queries::delete(&self.pool, user_id, coin_id).await?)
    }
}

#[async_trait]
impl ConversationStore for PgStore {
    async fn append_turn(&self, turn: ChatTurn) -> Result<ChatTurn, StoreError> {
        Ok(chat_queries::insert(&self.pool, turn).await?)
    }

    async fn list_turns(&self, user_id: Uuid) -> Result<Vec<ChatTurn>, StoreError> {
        Ok(chat_queries::fetch_for_user(&self.pool, user_id).await?)
    }

    async fn list_recent_turns(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        Ok(chat_queries::fetch_recent_for_user(&self.pool, user_id, limit).await?)
    }
}
