//! User model for the chat service.
//!
//! This module defines the stored account entity and the data carried by
//! create and update operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (v4, immutable).
    pub id: Uuid,
    /// Display name (unique).
    pub username: String,
    /// Email address (unique, used for login).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    ///
    /// Never serialized; cleared before a user leaves the account layer.
    #[serde(skip_serializing)]
    pub password: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Drop the stored credential hash.
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
}

impl NewUser {
    /// Create a new user record.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Data for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New username.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set new email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.io".to_string(),
            password: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_user() {
        let user = NewUser::new("alice", "a@x.io", "hash");
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.io");
        assert_eq!(user.password, "hash");
    }

    #[test]
    fn test_user_update_builder() {
        let update = UserUpdate::new().username("bob");
        assert_eq!(update.username.as_deref(), Some("bob"));
        assert!(update.email.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_user_update_empty() {
        assert!(UserUpdate::new().is_empty());
    }

    #[test]
    fn test_without_password() {
        let user = sample_user().without_password();
        assert!(user.password.is_empty());
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "a@x.io");
    }
}
