//! Response DTOs for the chat API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::{Session, User};
use crate::message::Message;

/// Generic API response wrapper. Every success body is `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Liveness probe response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving.
    pub status: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register/login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token for the new session.
    pub token: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated account.
    pub user: UserResponse,
}

impl AuthResponse {
    /// Build from an account and its freshly created session.
    pub fn new(user: User, session: Session) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
            user: user.into(),
        }
    }
}

/// Registration that created the account but could not open a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    /// The new account.
    pub user: UserResponse,
    /// Tells the client to log in separately.
    pub message: String,
}

impl RegisteredResponse {
    pub fn new(user: User) -> Self {
        Self {
            user: user.into(),
            message: "Registration successful but login failed. Please login manually"
                .to_string(),
        }
    }
}

/// A chat message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id,
            user_id: msg.user_id,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

/// Acknowledgement for operations with nothing else to return.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
