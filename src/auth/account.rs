//! User account management.
//!
//! Registration, login and profile operations. Every user returned from this
//! module has its credential hash cleared.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::password::{CredentialHasher, HashError};
use super::session::{SessionError, SessionManager};
use super::validation::{validate_email, validate_registration, validate_username, ValidationError};
use crate::db::{NewUser, Session, User, UserStore, UserUpdate};
use crate::{ChatError, ErrorKind};

/// Account-related errors.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Email or username already registered.
    #[error("user already exists")]
    AlreadyExists,

    /// Unknown email or wrong secret.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account does not exist.
    #[error("user not found")]
    NotFound,

    /// A field failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Credential hashing failed.
    #[error("hashing error: {0}")]
    Hash(#[from] HashError),

    /// Session creation failed after a successful account operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The user store failed.
    #[error("user store error: {0}")]
    Store(ChatError),
}

impl AccountError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::AlreadyExists => ErrorKind::Conflict,
            AccountError::InvalidCredentials => ErrorKind::Unauthenticated,
            AccountError::NotFound => ErrorKind::NotFound,
            AccountError::Validation(_) => ErrorKind::Validation,
            AccountError::Hash(e) => e.kind(),
            AccountError::Session(e) => e.kind(),
            AccountError::Store(e) => e.kind(),
        }
    }
}

impl From<ChatError> for AccountError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Conflict(_) => AccountError::AlreadyExists,
            other => AccountError::Store(other),
        }
    }
}

/// Profile changes. Empty or absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New username.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
}

impl ProfileUpdate {
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

    /// Keep only non-empty fields, validated.
    fn into_user_update(self) -> Result<UserUpdate, ValidationError> {
        let mut update = UserUpdate::new();
        if let Some(username) = self.username.filter(|s| !s.is_empty()) {
            validate_username(&username)?;
            update = update.username(username);
        }
        if let Some(email) = self.email.filter(|s| !s.is_empty()) {
            validate_email(&email)?;
            update = update.email(email);
        }
        Ok(update)
    }
}

/// Account operations over the user store.
#[derive(Clone)]
pub struct AccountManager {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    sessions: SessionManager,
}

impl AccountManager {
    /// Create an account manager.
    pub fn new(users: Arc<dyn UserStore>, hasher: CredentialHasher, sessions: SessionManager) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }

    /// The session manager used after register and login.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Hash on the blocking pool.
    async fn hash_secret(&self, secret: &str) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| HashError::Hashing(e.to_string()))??;
        Ok(hash)
    }

    async fn verify_secret(&self, secret: &str, hashed: &str) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        let hashed = hashed.to_string();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&secret, &hashed))
            .await
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(ok)
    }

    /// Register a new account.
    ///
    /// The email pre-check only produces the early error; the store's
    /// uniqueness constraint decides concurrent registrations.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        secret: &str,
    ) -> Result<User, AccountError> {
        if self.users.get_by_email(email).await?.is_some() {
            debug!(email = %email, "Registration rejected: email taken");
            return Err(AccountError::AlreadyExists);
        }

        validate_registration(username, email, secret)?;

        let hash = self.hash_secret(secret).await?;
        let user = self
            .users
            .create(Uuid::new_v4(), &NewUser::new(username, email, hash))
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.without_password())
    }

    /// Check credentials and return the account.
    ///
    /// Unknown email and wrong secret are indistinguishable to the caller.
    pub async fn login(&self, email: &str, secret: &str) -> Result<User, AccountError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            // Pay the same argon2 cost as a wrong password.
            let decoy = self.hasher.decoy_hash().to_string();
            self.verify_secret(secret, &decoy).await?;
            debug!("Login failed: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self.verify_secret(secret, &user.password).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user.without_password())
    }

    /// Register and open a session for the new account.
    ///
    /// The account stays registered when no session can be opened; the
    /// session is `None` and the caller has to log in separately.
    pub async fn register_with_session(
        &self,
        username: &str,
        email: &str,
        secret: &str,
    ) -> Result<(User, Option<Session>), AccountError> {
        let user = self.register(username, email, secret).await?;
        match self.sessions.create_session(user.id).await {
            Ok(session) => Ok((user, Some(session))),
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Registered without a session");
                Ok((user, None))
            }
        }
    }

    /// Log in and open a session.
    pub async fn login_with_session(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<(User, Session), AccountError> {
        let user = self.login(email, secret).await?;
        let session = self.sessions.create_session(user.id).await?;
        Ok((user, session))
    }

    /// Get an account by ID.
    pub async fn get_profile(&self, id: Uuid) -> Result<User, AccountError> {
        self.users
            .get_by_id(id)
            .await?
            .map(User::without_password)
            .ok_or(AccountError::NotFound)
    }

    /// Change username and/or email.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, AccountError> {
        let update = update.into_user_update()?;

        let user = self
            .users
            .update(id, &update)
            .await?
            .ok_or(AccountError::NotFound)?;

        info!(user_id = %id, "Profile updated");
        Ok(user.without_password())
    }

    /// Delete an account with all its sessions and messages.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AccountError> {
        if !self.users.delete(id).await? {
            return Err(AccountError::NotFound);
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::db::{SessionRepository, SessionStore, UserRepository};
    use crate::Database;

    struct Fixture {
        db: Database,
        accounts: AccountManager,
    }

    async fn setup() -> Fixture {
        setup_with_tokens(TokenService::new("test-secret-key", 3600).unwrap()).await
    }

    async fn setup_with_tokens(tokens: TokenService) -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let users = Arc::new(UserRepository::new(db.pool().clone()));
        let store = Arc::new(SessionRepository::new(db.pool().clone()));
        let sessions = SessionManager::new(store, tokens, 3600);
        let hasher = CredentialHasher::with_params(1024, 1, 1).unwrap();
        Fixture {
            accounts: AccountManager::new(users, hasher, sessions),
            db,
        }
    }

    #[tokio::test]
    async fn test_register_clears_hash() {
        let f = setup().await;
        let user = f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.io");
        assert!(user.password.is_empty());

        // The stored record does carry the hash.
        let stored = UserRepository::new(f.db.pool().clone())
            .get_by_id(user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let f = setup().await;
        f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let err = f
            .accounts
            .register("alice2", "a@x.io", "pw1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_hits_store_constraint() {
        let f = setup().await;
        f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let err = f
            .accounts
            .register("alice", "other@x.io", "pw1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_register_concurrent_same_email() {
        let f = setup().await;
        let a = f.accounts.clone();
        let b = f.accounts.clone();

        let (ra, rb) = tokio::join!(
            a.register("alice", "a@x.io", "pw1234"),
            b.register("alicia", "a@x.io", "pw1234"),
        );

        let successes = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);
        let failure = ra.err().or(rb.err()).unwrap();
        assert!(matches!(failure, AccountError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let f = setup().await;

        let err = f.accounts.register("al", "a@x.io", "pw1234").await.unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::UsernameTooShort)
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = f.accounts.register("alice", "", "pw1234").await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(ValidationError::EmailEmpty)));

        let err = f.accounts.register("alice", "a@x.io", "pw").await.unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::SecretTooShort)
        ));
    }

    #[tokio::test]
    async fn test_login() {
        let f = setup().await;
        let registered = f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let user = f.accounts.login("a@x.io", "pw1234").await.unwrap();
        assert_eq!(user.id, registered.id);
        assert!(user.password.is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let f = setup().await;
        f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let wrong_secret = f.accounts.login("a@x.io", "wrong!").await.unwrap_err();
        let unknown_email = f.accounts.login("nobody@x.io", "pw1234").await.unwrap_err();

        assert!(matches!(wrong_secret, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_secret.to_string(), unknown_email.to_string());
        assert_eq!(wrong_secret.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_email_login_runs_full_verification() {
        let f = setup().await;

        // Even the secret behind the decoy hash cannot log in.
        let err = f
            .accounts
            .login("nobody@x.io", "decoy credential")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
        assert!(f.accounts.hasher.decoy_hash().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_login_with_session() {
        let f = setup().await;
        f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let (user, session) = f.accounts.login_with_session("a@x.io", "pw1234").await.unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(
            f.accounts.sessions().authenticate(&session.token).await.unwrap(),
            user.id
        );
    }

    #[tokio::test]
    async fn test_register_with_session() {
        let f = setup().await;
        let (user, session) = f
            .accounts
            .register_with_session("alice", "a@x.io", "pw1234")
            .await
            .unwrap();
        assert_eq!(session.unwrap().user_id, user.id);
    }

    #[tokio::test]
    async fn test_register_keeps_account_when_session_fails() {
        // An unbounded token lifetime cannot be encoded, so issuing fails.
        let f = setup_with_tokens(TokenService::new("test-secret-key", u64::MAX).unwrap()).await;

        let (user, session) = f
            .accounts
            .register_with_session("alice", "a@x.io", "pw1234")
            .await
            .unwrap();
        assert!(session.is_none());
        assert_eq!(user.username, "alice");
        assert!(user.password.is_empty());

        // The account exists: credentials work and a retry is a conflict.
        assert_eq!(f.accounts.login("a@x.io", "pw1234").await.unwrap().id, user.id);
        let err = f
            .accounts
            .register_with_session("alice", "a@x.io", "pw1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));

        // Login still reports the session failure.
        let err = f
            .accounts
            .login_with_session("a@x.io", "pw1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Session(SessionError::Creation(_))));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let f = setup().await;
        let user = f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let profile = f.accounts.get_profile(user.id).await.unwrap();
        assert_eq!(profile.username, "alice");
        assert!(profile.password.is_empty());

        let err = f.accounts.get_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let f = setup().await;
        let user = f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();

        let updated = f
            .accounts
            .update_profile(user.id, ProfileUpdate::new().username("alicia").email(""))
            .await
            .unwrap();
        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.email, "a@x.io");
        assert!(updated.password.is_empty());
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_profile_errors() {
        let f = setup().await;
        let alice = f.accounts.register("alice", "a@x.io", "pw1234").await.unwrap();
        f.accounts.register("bob", "b@x.io", "pw1234").await.unwrap();

        let err = f
            .accounts
            .update_profile(alice.id, ProfileUpdate::new().email("b@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));

        let err = f
            .accounts
            .update_profile(alice.id, ProfileUpdate::new().email("broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));

        let err = f
            .accounts
            .update_profile(Uuid::new_v4(), ProfileUpdate::new().username("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_user_revokes_sessions() {
        let f = setup().await;
        let (user, session) = f
            .accounts
            .register_with_session("alice", "a@x.io", "pw1234")
            .await
            .unwrap();
        let session = session.unwrap();

        f.accounts.delete_user(user.id).await.unwrap();

        assert!(matches!(
            f.accounts.get_profile(user.id).await,
            Err(AccountError::NotFound)
        ));
        assert!(matches!(
            f.accounts.sessions().validate_session(&session.token).await,
            Err(SessionError::NotFound)
        ));
        let store = SessionRepository::new(f.db.pool().clone());
        assert!(store.get_by_user_id(user.id).await.unwrap().is_empty());

        let err = f.accounts.delete_user(user.id).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }
}
