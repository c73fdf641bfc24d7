//! Message service for the chat service.
//!
//! This module provides high-level message operations with content
//! validation, sender existence checks and owner-only deletion.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{Message, NewMessage};
use crate::db::{MessageStore, UserStore};
use crate::{ChatError, Result};

/// Maximum length for message content (in characters).
pub const MAX_CONTENT_LENGTH: usize = 1000;

/// Characters of content included in log lines.
const LOG_PREVIEW_LENGTH: usize = 50;

/// Validate message content.
fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ChatError::Validation("message content is empty".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(ChatError::Validation(format!(
            "message content is too long (max {} characters)",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}

fn preview(content: &str) -> String {
    content.chars().take(LOG_PREVIEW_LENGTH).collect()
}

/// Service for message operations.
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    users: Arc<dyn UserStore>,
}

impl MessageService {
    /// Create a new MessageService over the given stores.
    pub fn new(messages: Arc<dyn MessageStore>, users: Arc<dyn UserStore>) -> Self {
        Self { messages, users }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<()> {
        if self.users.get_by_id(user_id).await?.is_none() {
            warn!(user_id = %user_id, "User not found");
            return Err(ChatError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Post a message on behalf of `user_id`.
    pub async fn create(&self, user_id: Uuid, content: &str) -> Result<Message> {
        debug!(user_id = %user_id, content = %preview(content), "Creating message");

        self.ensure_user_exists(user_id).await?;
        validate_content(content)?;

        let message = self
            .messages
            .create(Uuid::new_v4(), &NewMessage::new(user_id, content))
            .await?;

        info!(user_id = %user_id, message_id = %message.id, "Message created");
        Ok(message)
    }

    /// Get a message by ID.
    pub async fn get(&self, id: Uuid) -> Result<Message> {
        self.messages
            .get_by_id(id)
            .await?
            .ok_or_else(|| ChatError::NotFound("message".to_string()))
    }

    /// Messages sent by `user_id`, oldest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.ensure_user_exists(user_id).await?;

        let messages = self.messages.get_by_user_id(user_id).await?;
        debug!(user_id = %user_id, count = messages.len(), "Fetched user messages");
        Ok(messages)
    }

    /// All messages, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Message>> {
        let messages = self.messages.get_all().await?;
        debug!(count = messages.len(), "Fetched all messages");
        Ok(messages)
    }

    /// Delete a message. Only its sender may delete it.
    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<()> {
        let message = self.get(id).await?;

        if !message.is_sent_by(requester) {
            warn!(
                user_id = %requester,
                message_id = %id,
                "Attempt to delete another user's message"
            );
            return Err(ChatError::Permission(
                "only the sender can delete this message".to_string(),
            ));
        }

        if !self.messages.delete(id).await? {
            return Err(ChatError::NotFound("message".to_string()));
        }

        info!(user_id = %requester, message_id = %id, "Message deleted");
        Ok(())
    }
}
