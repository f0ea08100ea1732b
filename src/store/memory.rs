use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{ChatTurn, PortfolioEntry, TrackedCoin};
use crate::store::{already_tracked, ConversationStore, PortfolioStore};

/// Process-local store used by tests and `STORE_BACKEND=memory`.
/// Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<Uuid, Vec<PortfolioEntry>>>,
    coins: Arc<DashMap<Uuid, Vec<TrackedCoin>>>,
    // Single log so insertion order is the transcript order
    turns: Arc<RwLock<Vec<ChatTurn>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn list_entries(&self, user_id: Uuid) -> Result<Vec<PortfolioEntry>, StoreError> {
        Ok(self
            .entries
            .get(&user_id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_entry(&self, entry: PortfolioEntry) -> Result<PortfolioEntry, StoreError> {
        self.entries
            .entry(entry.user_id)
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<u64, StoreError> {
        let Some(mut entries) = self.entries.get_mut(&user_id) else {
            return Ok(0);
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        Ok((before - entries.len()) as u64)
    }

    async fn list_tracked_coins(&self, user_id: Uuid) -> Result<Vec<TrackedCoin>, StoreError> {
        Ok(self
            .coins
            .get(&user_id)
            .map(|coins| coins.value().clone())
            .unwrap_or_default())
    }

    async fn add_tracked_coin(&self, coin: TrackedCoin) -> Result<TrackedCoin, StoreError> {
        let mut coins = self.coins.entry(coin.user_id).or_default();
        if coins.iter().any(|c| c.coin_id == coin.coin_id) {
            return Err(already_tracked(&coin.coin_id));
        }
        coins.push(coin.clone());
        Ok(coin)
    }

    async fn remove_tracked_coin(&self, user_id: Uuid, coin_id: &str) -> Result<u64, StoreError> {
        let Some(mut coins) = self.coins.get_mut(&user_id) else {
            return Ok(0);
        };
        let before = coins.len();
        coins.retain(|c| c.coin_id != coin_id);
        Ok((before - coins.len()) as u64)
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn append_turn(&self, turn: ChatTurn) -> Result<ChatTurn, StoreError> {
        self.turns.write().push(turn.clone());
        Ok(turn)
    }

    async fn list_turns(&self, user_id: Uuid) -> Result<Vec<ChatTurn>, StoreError> {
        Ok(self
            .turns
            .read()
            .iter()
            .filter(|turn| turn.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_recent_turns(&self, user_id: Uuid, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let mut recent: Vec<ChatTurn> = self
            .turns
            .read()
            .iter()
            .rev()
            .filter(|turn| turn.user_id == user_id)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatRole, ContextSnapshot, CreatePortfolioEntry, CreateTrackedCoin};

    fn entry(user_id: Uuid, coin: &str) -> PortfolioEntry {
        PortfolioEntry::new(
            user_id,
            CreatePortfolioEntry {
                coin_id: coin.to_string(),
                coin_name: coin.to_string(),
                amount: 1.0,
                avg_buy_price: 10.0,
                buy_date: None,
            },
        )
    }

    fn tracked(user_id: Uuid, coin: &str) -> TrackedCoin {
        TrackedCoin::new(
            user_id,
            CreateTrackedCoin {
                coin_id: coin.to_string(),
                coin_name: coin.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_entries_are_owner_scoped() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let a = store.create_entry(entry(alice, "bitcoin")).await.unwrap();
        store.create_entry(entry(bob, "ethereum")).await.unwrap();

        assert_eq!(store.list_entries(alice).await.unwrap().len(), 1);
        // Bob cannot delete Alice's entry
        assert_eq!(store.delete_entry(bob, a.id).await.unwrap(), 0);
        assert_eq!(store.delete_entry(alice, a.id).await.unwrap(), 1);
        assert!(store.list_entries(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entries_listed_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.create_entry(entry(user, "bitcoin")).await.unwrap();
        store.create_entry(entry(user, "solana")).await.unwrap();

        let coins: Vec<String> = store
            .list_entries(user)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.coin_id)
            .collect();
        assert_eq!(coins, vec!["solana", "bitcoin"]);
    }

    #[tokio::test]
    async fn test_duplicate_tracked_coin_conflicts() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.add_tracked_coin(tracked(user, "bitcoin")).await.unwrap();

        let result = store.add_tracked_coin(tracked(user, "bitcoin")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Another owner may track the same coin
        assert!(store.add_tracked_coin(tracked(Uuid::new_v4(), "bitcoin")).await.is_ok());
    }

    #[tokio::test]
    async fn test_turn_round_trip_preserves_role_and_text() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let text = "Ünïcödé 🚀 \"quoted\"\nline two";
        store
            .append_turn(ChatTurn::new(user, ChatRole::User, text, ContextSnapshot::default()))
            .await
            .unwrap();
        store
            .append_turn(ChatTurn::new(user, ChatRole::Assistant, "reply", ContextSnapshot::default()))
            .await
            .unwrap();

        let turns = store.list_turns(user).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].message, text);
        assert_eq!(turns[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_recent_turns_are_the_owners_tail_in_order() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        for i in 0..5 {
            store
                .append_turn(ChatTurn::new(user, ChatRole::User, format!("turn {}", i), ContextSnapshot::default()))
                .await
                .unwrap();
            store
                .append_turn(ChatTurn::new(other, ChatRole::User, "elsewhere", ContextSnapshot::default()))
                .await
                .unwrap();
        }

        let recent = store.list_recent_turns(user, 3).await.unwrap();
        let messages: Vec<&str> = recent.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["turn 2", "turn 3", "turn 4"]);

        assert_eq!(store.list_recent_turns(user, 50).await.unwrap().len(), 5);
        assert!(store.list_recent_turns(user, 0).await.unwrap().is_empty());
    }
}
