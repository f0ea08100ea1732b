mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinfolio_backend::models::ChatRole;
use coinfolio_backend::store::MemoryStore;

use common::{assistant_config, bearer, expect_json, send, test_app, wait_for_turns, MODEL};

fn generate_path() -> String {
    format!("/v1beta/models/{}:generateContent", MODEL)
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
        "usageMetadata": {"totalTokenCount": 42}
    })
}

fn bitcoin_request() -> Value {
    json!({
        "message": "What's my portfolio worth?",
        "portfolio": [{"coin": "bitcoin", "amount": 1, "avgBuyPrice": 50000}],
        "selectedCoins": [],
        "chatHistory": []
    })
}

#[tokio::test]
async fn test_chat_with_ai_returns_model_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Your bitcoin cost $50,000.")))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(bitcoin_request())).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body, json!({"response": "Your bitcoin cost $50,000."}));

    let requests = server.received_requests().await.expect("recorded requests");
    let sent: Value = requests[0].body_json().expect("json request body");

    assert_eq!(sent["contents"].as_array().map(Vec::len), Some(1));
    assert_eq!(sent["contents"][0]["role"], "user");
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "What's my portfolio worth?");

    let instruction = &sent["systemInstruction"]["parts"];
    assert_eq!(instruction.as_array().map(Vec::len), Some(1));
    let instruction = instruction[0]["text"].as_str().unwrap_or_default();
    assert!(instruction.contains("BITCOIN"));
    assert!(instruction.contains("$50000.00"));

    assert_eq!(sent["generationConfig"]["topK"], 40);
    assert_eq!(sent["generationConfig"]["maxOutputTokens"], 1024);
}

#[tokio::test]
async fn test_upstream_429_becomes_500_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "quota exceeded"}})))
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(bitcoin_request())).await;
    let body = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["details"], "Gemini API error: 429");
}

#[tokio::test]
async fn test_body_without_candidates_is_an_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(bitcoin_request())).await;
    let body = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(body["details"], "Invalid response from Gemini API");
}

#[tokio::test]
async fn test_missing_key_makes_no_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("   ")));
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(bitcoin_request())).await;
    let body = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(body["details"], "GEMINI_API_KEY not configured");
}

#[tokio::test]
async fn test_empty_message_is_400_without_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let mut request = bitcoin_request();
    request["message"] = json!("   ");
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(request)).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid request");
}

#[tokio::test]
async fn test_empty_portfolio_gets_onboarding_reply_without_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let response = send(
        &app,
        "POST",
        "/api/chat-with-ai",
        None,
        Some(json!({"message": "How am I doing?", "portfolio": []})),
    )
    .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert!(body["response"].as_str().unwrap_or_default().contains("portfolio"));
}

#[tokio::test]
async fn test_non_user_history_roles_are_sent_as_model_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Still holding.")))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let mut request = bitcoin_request();
    request["chatHistory"] = json!([
        {"role": "user", "content": "Hi"},
        {"role": "system", "content": "Welcome back."}
    ]);
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(request)).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["response"], "Still holding.");

    let requests = server.received_requests().await.expect("recorded requests");
    let sent: Value = requests[0].body_json().expect("json request body");
    let roles: Vec<&str> = sent["contents"]
        .as_array()
        .map(|contents| contents.iter().filter_map(|c| c["role"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(roles, vec!["user", "model", "user"]);
}

#[tokio::test]
async fn test_malformed_bodies_get_invalid_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));

    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(json!({"message": 5}))).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid request");
    assert!(!body["details"].as_str().unwrap_or_default().is_empty());

    let response = send(&app, "POST", "/api/chat-with-ai", None, None).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid request");

    let response = send(&app, "POST", "/api/chat", None, Some(json!({"text": "hello"}))).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid request");
}

#[tokio::test]
async fn test_invalid_holding_is_400_without_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));
    let mut request = bitcoin_request();
    request["portfolio"][0]["amount"] = json!(-5);
    let response = send(&app, "POST", "/api/chat-with-ai", None, Some(request)).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid request");
    assert!(body["details"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Amount and price must be positive numbers."));
}

#[tokio::test]
async fn test_preflight_is_answered_with_cors_headers() {
    let server = MockServer::start().await;
    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/chat-with-ai")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization, x-client-info, apikey, content-type")
        .body(axum::body::Body::empty())
        .expect("request");
    let response = tower::ServiceExt::oneshot(app, request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    for header in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(header), "missing {} in {}", header, allowed);
    }
}

#[tokio::test]
async fn test_chat_session_persists_both_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Solana is up 8.7% today.")))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let app = test_app(&store, assistant_config(&server.uri(), Some("test-key")));
    let user = Uuid::new_v4();
    let token = bearer(user);

    let entry = json!({"coin_id": "solana", "coin_name": "Solana", "amount": 10, "avg_buy_price": 20.5});
    let response = send(&app, "POST", "/api/portfolio", Some(&token), Some(entry)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "POST", "/api/chat", Some(&token), Some(json!({"message": "How is SOL?"}))).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body, json!({"outcome": "replied", "message": "Solana is up 8.7% today."}));

    let turns = wait_for_turns(&store, user, 2).await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, ChatRole::User);
    assert_eq!(turns[0].message, "How is SOL?");
    assert_eq!(turns[1].role, ChatRole::Assistant);
    assert_eq!(turns[0].context.portfolio_entries, 1);

    let response = send(&app, "GET", "/api/chat", Some(&token), None).await;
    let transcript = expect_json(response, StatusCode::OK).await;
    assert_eq!(transcript.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_chat_session_upstream_failure_persists_no_assistant_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let app = test_app(&store, assistant_config(&server.uri(), Some("test-key")));
    let user = Uuid::new_v4();
    let token = bearer(user);

    let entry = json!({"coin_id": "bitcoin", "coin_name": "Bitcoin", "amount": 1, "avg_buy_price": 50000});
    send(&app, "POST", "/api/portfolio", Some(&token), Some(entry)).await;

    let response = send(&app, "POST", "/api/chat", Some(&token), Some(json!({"message": "Rebalance?"}))).await;
    let body = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert!(body["details"].as_str().unwrap_or_default().contains("try again"));

    wait_for_turns(&store, user, 1).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let turns = wait_for_turns(&store, user, 1).await;
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, ChatRole::User);
}

#[tokio::test]
async fn test_chat_outcomes_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&MemoryStore::new(), assistant_config(&server.uri(), Some("test-key")));

    let response = send(&app, "POST", "/api/chat", None, Some(json!({"message": "hi"}))).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["outcome"], "sign_in_required");

    let token = bearer(Uuid::new_v4());
    let response = send(&app, "POST", "/api/chat", Some(&token), Some(json!({"message": "hi"}))).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["outcome"], "onboarding_required");
}
