use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::models::CoinMarketStats;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:coin_id", get(get_market_stats))
}

pub async fn get_market_stats(Path(coin_id): Path<String>) -> Json<CoinMarketStats> {
    info!("GET /api/market/{} - Fetching market statistics", coin_id);
    Json(services::market_service::market_stats(&coin_id))
}
