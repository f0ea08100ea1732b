use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{CreateTrackedCoin, TrackedCoin};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_tracked_coins).post(track_coin))
        .route("/defaults", post(seed_defaults))
        .route("/:coin_id", delete(untrack_coin))
}

#[axum::debug_handler(state = AppState)]
pub async fn track_coin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateTrackedCoin>, JsonRejection>,
) -> Result<(StatusCode, Json<TrackedCoin>), AppError> {
    let Json(data) = payload?;
    info!("POST /api/tracked-coins - Tracking {} for {}", data.coin_id, user_id);
    let coin = services::tracked_coin_service::track(state.portfolio_store.as_ref(), user_id, data)
        .await
        .map_err(|e| {
            error!("Failed to track coin: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(coin)))
}

pub async fn fetch_tracked_coins(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TrackedCoin>>, AppError> {
    info!("GET /api/tracked-coins - Fetching tracked coins for {}", user_id);
    let coins = services::tracked_coin_service::fetch_all(state.portfolio_store.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch tracked coins for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(coins))
}

pub async fn seed_defaults(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TrackedCoin>>, AppError> {
    info!("POST /api/tracked-coins/defaults - Seeding default coins for {}", user_id);
    let added = services::tracked_coin_service::seed_defaults(state.portfolio_store.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!("Failed to seed default coins for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(added))
}

pub async fn untrack_coin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(coin_id): Path<String>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/tracked-coins/{} - Untracking coin", coin_id);
    services::tracked_coin_service::untrack(state.portfolio_store.as_ref(), user_id, &coin_id)
        .await
        .map_err(|e| {
            error!("Failed to untrack {}: {}", coin_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
