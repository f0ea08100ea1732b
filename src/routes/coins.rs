use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{CatalogCoin, CoinSearchParams};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_coins))
}

/// Catalog search. Signed-in viewers do not see coins they already track.
pub async fn search_coins(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(params): Query<CoinSearchParams>,
) -> Result<Json<Vec<CatalogCoin>>, AppError> {
    info!("GET /api/coins - Searching catalog for {:?}", params.search);

    let tracked: HashSet<String> = match viewer {
        Some(user_id) => services::tracked_coin_service::fetch_ids(state.portfolio_store.as_ref(), user_id)
            .await
            .map_err(|e| {
                error!("Failed to load tracked coins for {}: {}", user_id, e);
                e
            })?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    Ok(Json(services::market_service::search_catalog(params.search.as_deref(), &tracked)))
}
