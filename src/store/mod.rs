use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{ChatTurn, PortfolioEntry, TrackedCoin};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Owner-scoped holdings and tracked-coin lists.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Newest entry first.
    async fn list_entries(&self, user_id: Uuid) -> Result<Vec<PortfolioEntry>, StoreError>;

    async fn create_entry(&self, entry: PortfolioEntry) -> Result<PortfolioEntry, StoreError>;

    /// Returns the number of rows removed (0 when the entry is absent or owned by someone else).
    async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<u64, StoreError>;

    /// Oldest first.
    async fn list_tracked_coins(&self, user_id: Uuid) -> Result<Vec<TrackedCoin>, StoreError>;

    /// Fails with `StoreError::Conflict` when the coin is already tracked by the owner.
    async fn add_tracked_coin(&self, coin: TrackedCoin) -> Result<TrackedCoin, StoreError>;

    async fn remove_tracked_coin(&self, user_id: Uuid, coin_id: &str) -> Result<u64, StoreError>;
}

/// Append-only chat transcript per owner.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn append_turn(&self, turn: ChatTurn) -> Result<ChatTurn, StoreError>;

    /// Oldest first.
    async fn list_turns(&self, user_id: Uuid) -> Result<Vec<ChatTurn>, StoreError>;

    /// The latest `limit` turns, oldest first.
    async fn list_recent_turns(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatTurn>, StoreError>;
}

pub(crate) fn already_tracked(coin_id: &str) -> StoreError {
    StoreError::Conflict(format!("{} is already being tracked", coin_id))
}
