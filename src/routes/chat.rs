use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::{AuthUser, Viewer};
use crate::errors::AppError;
use crate::models::{ChatTurn, SendChatMessage, SessionReply};
use crate::services;
use crate::services::chat_session::ChatSession;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_transcript).post(send_message))
}

pub async fn fetch_transcript(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChatTurn>>, AppError> {
    info!("GET /api/chat - Fetching transcript for {}", user_id);
    let turns = state.conversation_store.list_turns(user_id).await.map_err(|e| {
        error!("Failed to fetch transcript for {}: {}", user_id, e);
        AppError::from(e)
    })?;
    Ok(Json(turns))
}

/// One chat turn against the caller's stored portfolio and tracked coins.
#[axum::debug_handler(state = AppState)]
pub async fn send_message(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    payload: Result<Json<SendChatMessage>, JsonRejection>,
) -> Result<Json<SessionReply>, AppError> {
    let Json(data) = payload?;
    info!("POST /api/chat - New message (signed in: {})", viewer.is_some());

    let Some(user_id) = viewer else {
        let mut session = ChatSession::new(None, state.gateway.clone(), state.conversation_store.clone());
        return Ok(Json(session.send(&data.message, &[], &[]).await?));
    };

    let store = state.portfolio_store.as_ref();
    let portfolio = services::portfolio_service::fetch_snapshot(store, user_id).await?;
    let tracked_coins = services::tracked_coin_service::fetch_ids(store, user_id).await?;

    let mut session = ChatSession::restore(user_id, state.gateway.clone(), state.conversation_store.clone())
        .await
        .map_err(|e| {
            error!("Failed to restore chat session for {}: {}", user_id, e);
            AppError::from(e)
        })?;

    let reply = session.send(&data.message, &portfolio, &tracked_coins).await?;
    Ok(Json(reply))
}
