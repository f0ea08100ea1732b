use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{ChatRequest, ChatResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(chat_with_ai))
}

/// Stateless assistant call: the caller supplies portfolio, tracked coins and history.
#[axum::debug_handler]
pub async fn chat_with_ai(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    info!(
        "POST /api/chat-with-ai - {} portfolio entries, {} history turns",
        request.portfolio.len(),
        request.chat_history.len()
    );

    let response = state.gateway.reply(&request).await.map_err(|e| {
        error!("Assistant request failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(ChatResponse { response }))
}
