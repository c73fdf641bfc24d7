//! Message types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A posted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Message {
    /// Message ID.
    pub id: Uuid,
    /// Sender.
    pub user_id: Uuid,
    /// Message text.
    pub content: String,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether `user_id` sent this message.
    pub fn is_sent_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data for creating a new message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Sender.
    pub user_id: Uuid,
    /// Message text.
    pub content: String,
}

impl NewMessage {
    /// Create a new message record.
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
        }
    }
}
