use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{CreatePortfolioEntry, PortfolioEntry, PortfolioSummary};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_portfolio).post(create_entry))
        .route("/:id", delete(delete_entry))
}

#[axum::debug_handler(state = AppState)]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreatePortfolioEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<PortfolioEntry>), AppError> {
    let Json(data) = payload?;
    info!("POST /api/portfolio - Adding {} for {}", data.coin_id, user_id);
    let entry = services::portfolio_service::create(state.portfolio_store.as_ref(), user_id, data)
        .await
        .map_err(|e| {
            error!("Failed to add portfolio entry: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn fetch_portfolio(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PortfolioSummary>, AppError> {
    info!("GET /api/portfolio - Fetching entries for {}", user_id);
    let summary = services::portfolio_service::fetch_summary(state.portfolio_store.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolio for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(summary))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/portfolio/{} - Deleting entry", id);
    services::portfolio_service::delete(state.portfolio_store.as_ref(), user_id, id)
        .await
        .map_err(|e| {
            error!("Failed to delete portfolio entry {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
