use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CreatePortfolioEntry, PortfolioEntry, PortfolioSnapshotEntry, PortfolioSummary};
use crate::store::PortfolioStore;

pub async fn create(
    store: &dyn PortfolioStore,
    user_id: Uuid,
    input: CreatePortfolioEntry,
) -> Result<PortfolioEntry, AppError> {
    let input = input.validated().map_err(AppError::Validation)?;
    let entry = store.create_entry(PortfolioEntry::new(user_id, input)).await?;
    Ok(entry)
}

pub async fn fetch_summary(store: &dyn PortfolioStore, user_id: Uuid) -> Result<PortfolioSummary, AppError> {
    let entries = store.list_entries(user_id).await?;
    Ok(PortfolioSummary::from(entries))
}

/// Holdings in the shape the assistant consumes.
pub async fn fetch_snapshot(
    store: &dyn PortfolioStore,
    user_id: Uuid,
) -> Result<Vec<PortfolioSnapshotEntry>, AppError> {
    let entries = store.list_entries(user_id).await?;
    Ok(entries.iter().map(PortfolioSnapshotEntry::from).collect())
}

pub async fn delete(store: &dyn PortfolioStore, user_id: Uuid, id: Uuid) -> Result<u64, AppError> {
    match store.delete_entry(user_id, id).await {
        Ok(0) => Err(AppError::NotFound("Portfolio entry not found".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}
