#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use coinfolio_backend::app::create_app;
use coinfolio_backend::auth::Claims;
use coinfolio_backend::config::AssistantConfig;
use coinfolio_backend::external::gemini::GeminiProvider;
use coinfolio_backend::models::ChatTurn;
use coinfolio_backend::services::assistant_gateway::AssistantGateway;
use coinfolio_backend::state::AppState;
use coinfolio_backend::store::{ConversationStore, MemoryStore};

pub const JWT_SECRET: &str = "integration-secret";
pub const MODEL: &str = "gemini-test";

pub fn assistant_config(base_url: &str, api_key: Option<&str>) -> AssistantConfig {
    AssistantConfig {
        api_key: api_key.map(String::from),
        base_url: base_url.to_string(),
        model: MODEL.to_string(),
        ..AssistantConfig::default()
    }
}

pub fn test_app(store: &MemoryStore, assistant: AssistantConfig) -> Router {
    let provider = GeminiProvider::from_config(&assistant).expect("http client");
    let state = AppState {
        portfolio_store: Arc::new(store.clone()),
        conversation_store: Arc::new(store.clone()),
        gateway: Arc::new(AssistantGateway::new(assistant, Arc::new(provider))),
        jwt_secret: Some(JWT_SECRET.to_string()),
    };
    create_app(state)
}

/// Authorization header for `user_id`, signed the way the auth provider signs sessions.
pub fn bearer(user_id: Uuid) -> String {
    bearer_signed_with(user_id, JWT_SECRET)
}

pub fn bearer_signed_with(user_id: Uuid, secret: &str) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).expect("token");
    format!("Bearer {}", token)
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    app.clone().oneshot(request).await.expect("response")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    json_body(response).await
}

/// Persistence trails the response; poll until `expected` turns are stored.
pub async fn wait_for_turns(store: &MemoryStore, user_id: Uuid, expected: usize) -> Vec<ChatTurn> {
    for _ in 0..100 {
        let turns = store.list_turns(user_id).await.expect("turns");
        if turns.len() >= expected {
            return turns;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.list_turns(user_id).await.expect("turns")
}
