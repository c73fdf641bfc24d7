//! Middleware for the chat API.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{bearer_token, require_session, AuthUser};
pub use cors::create_cors_layer;
pub use security::security_headers;
