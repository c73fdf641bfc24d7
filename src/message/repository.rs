//! Message repository for the chat service.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::types::{Message, NewMessage};
use crate::db::{DbPool, MessageStore};
use crate::{ChatError, Result};

const MESSAGE_COLUMNS: &str = "id, user_id, content, created_at";

/// Repository for message operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: DbPool,
}

impl MessageRepository {
    /// Create a new MessageRepository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn create(&self, id: Uuid, new_message: &NewMessage) -> Result<Message> {
        sqlx::query("INSERT INTO messages (id, user_id, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(new_message.user_id)
            .bind(&new_message.content)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChatError::NotFound("message".to_string()))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE user_id = ?
             ORDER BY created_at, rowid"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn get_all(&self) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
