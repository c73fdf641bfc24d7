//! Shared setup for the web API integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use chat_service::auth::{AccountManager, CredentialHasher, SessionManager, TokenService};
use chat_service::config::ServerConfig;
use chat_service::db::{SessionRepository, UserRepository};
use chat_service::message::{MessageRepository, MessageService};
use chat_service::web::{create_router, AppState};
use chat_service::Database;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A router over a fresh in-memory database.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
}

/// Create a test server with an in-memory database.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_tokens(TokenService::new(TEST_SECRET, 900).unwrap()).await
}

/// Create a test server that issues tokens with `tokens`.
pub async fn create_test_app_with_tokens(tokens: TokenService) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let users = Arc::new(UserRepository::new(db.pool().clone()));
    let sessions = SessionManager::new(
        Arc::new(SessionRepository::new(db.pool().clone())),
        tokens,
        3600,
    );
    // Minimal Argon2 cost keeps the suite fast.
    let hasher = CredentialHasher::with_params(1024, 1, 1).unwrap();
    let accounts = AccountManager::new(users.clone(), hasher, sessions);
    let messages = MessageService::new(
        Arc::new(MessageRepository::new(db.pool().clone())),
        users,
    );

    let state = Arc::new(AppState::new(accounts, messages));
    let router = create_router(state, &ServerConfig::default());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db }
}

/// Register a user and return the response body.
pub async fn register(server: &TestServer, username: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/v1/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Register a user and return `(token, user_id)`.
pub async fn register_token(server: &TestServer, username: &str) -> (String, String) {
    let body = register(server, username, &format!("{username}@example.com"), "password123").await;
    (
        body["data"]["token"].as_str().unwrap().to_string(),
        body["data"]["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Header value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
