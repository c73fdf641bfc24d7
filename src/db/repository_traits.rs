//! Store contracts for the chat service.
//!
//! The account, session and message layers depend on these traits rather
//! than on SQL repositories, so they can be exercised against any backend
//! that provides them. All traits are object safe and are held as
//! `Arc<dyn ...>`.
//!
//! Absence is reported as `Ok(None)` or `Ok(false)`, never as an error.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{NewUser, Session, User, UserUpdate};
use crate::message::{Message, NewMessage};
use crate::Result;

// ============================================================================
// User Store
// ============================================================================

/// Persistence operations for accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with the given ID.
    ///
    /// A duplicate username or email fails with [`crate::ChatError::Conflict`].
    async fn create(&self, id: Uuid, new_user: &NewUser) -> Result<User>;

    /// Get a user by ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Get a user by email address.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Apply an update and bump `updated_at`.
    ///
    /// Returns the updated user, or None if not found.
    async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<Option<User>>;

    /// Delete a user together with their messages and sessions.
    ///
    /// Either everything is removed or nothing is. Returns false if the user
    /// does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// Session Store
// ============================================================================

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session.
    async fn create(&self, session: &Session) -> Result<()>;

    /// Look up a session by its bearer token.
    async fn get_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// All sessions of a user, oldest first.
    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>>;

    /// Delete a session by ID.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Delete a session by token.
    async fn delete_by_token(&self, token: &str) -> Result<bool>;
}

// ============================================================================
// Message Store
// ============================================================================

/// Persistence operations for messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a new message.
    async fn create(&self, id: Uuid, new_message: &NewMessage) -> Result<Message>;

    /// Get a message by ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Message>>;

    /// Messages sent by a user, ordered by creation time.
    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Message>>;

    /// All messages, ordered by creation time.
    async fn get_all(&self) -> Result<Vec<Message>>;

    /// Delete a message by ID.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
