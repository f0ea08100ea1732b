use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, StoreError};
use crate::models::{normalize_coin_id, CreateTrackedCoin, TrackedCoin};
use crate::store::PortfolioStore;

pub async fn track(
    store: &dyn PortfolioStore,
    user_id: Uuid,
    input: CreateTrackedCoin,
) -> Result<TrackedCoin, AppError> {
    let input = input.validated().map_err(AppError::Validation)?;
    let coin = store.add_tracked_coin(TrackedCoin::new(user_id, input)).await?;
    Ok(coin)
}

pub async fn fetch_all(store: &dyn PortfolioStore, user_id: Uuid) -> Result<Vec<TrackedCoin>, AppError> {
    let coins = store.list_tracked_coins(user_id).await?;
    Ok(coins)
}

/// Coin ids only, as fed to the assistant.
pub async fn fetch_ids(store: &dyn PortfolioStore, user_id: Uuid) -> Result<Vec<String>, AppError> {
    let coins = store.list_tracked_coins(user_id).await?;
    Ok(coins.into_iter().map(|c| c.coin_id).collect())
}

/// First-login seeding. Coins the user already tracks are skipped.
pub async fn seed_defaults(store: &dyn PortfolioStore, user_id: Uuid) -> Result<Vec<TrackedCoin>, AppError> {
    let mut added = Vec::new();

    for input in CreateTrackedCoin::defaults() {
        let coin_id = input.coin_id.clone();
        match store.add_tracked_coin(TrackedCoin::new(user_id, input)).await {
            Ok(coin) => added.push(coin),
            Err(StoreError::Conflict(_)) => info!("{} already tracked by {}, skipping", coin_id, user_id),
            Err(e) => return Err(AppError::from(e)),
        }
    }

    Ok(added)
}

pub async fn untrack(store: &dyn PortfolioStore, user_id: Uuid, coin_id: &str) -> Result<u64, AppError> {
    let coin_id = normalize_coin_id(coin_id);
    match store.remove_tracked_coin(user_id, &coin_id).await {
        Ok(0) => Err(AppError::NotFound(format!("{} is not being tracked", coin_id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}
