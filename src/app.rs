use axum::http::{header, HeaderName, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{assistant, chat, coins, health, market, portfolio, setup, tracked_coins};
use crate::state::AppState;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/tracked-coins", tracked_coins::router())
        .nest("/api/coins", coins::router())
        .nest("/api/market", market::router())
        .nest("/api/chat", chat::router())
        .nest("/api/chat-with-ai", assistant::router())
        .nest("/api/setup", setup::router())
        .layer(cors())
        .with_state(state)
}
