//! Session lifecycle management.
//!
//! A session binds a signed bearer token to an account. Sessions move from
//! created to valid and end as either expired or revoked; nothing brings an
//! ended session back. Expired sessions are evicted lazily when they are
//! next presented. Every call goes to the session store; there is no
//! in-process cache.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::token::{mask_token, TokenError, TokenService};
use crate::db::{Session, SessionStore};
use crate::{ChatError, ErrorKind};

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No session exists for the presented token.
    #[error("session not found")]
    NotFound,

    /// The session has expired and was removed.
    #[error("session expired")]
    Expired,

    /// The stored token no longer verifies.
    #[error("invalid session token: {0}")]
    TokenInvalid(#[source] TokenError),

    /// The token's subject differs from the session owner.
    #[error("session subject mismatch")]
    SubjectMismatch,

    /// A new session could not be issued or stored.
    #[error("failed to create session: {0}")]
    Creation(#[source] CreationFailure),

    /// The session store failed.
    #[error("session store error: {0}")]
    Store(#[from] ChatError),
}

/// Why a new session could not be created.
#[derive(Error, Debug)]
pub enum CreationFailure {
    /// The token could not be issued.
    #[error("token issuance failed: {0}")]
    Token(#[source] TokenError),

    /// The configured lifetime gives no usable expiry.
    #[error("session expiry must be after its creation")]
    InvalidExpiry,

    /// The session row could not be stored.
    #[error("session could not be stored: {0}")]
    Persist(#[source] ChatError),
}

impl SessionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NotFound
            | SessionError::Expired
            | SessionError::TokenInvalid(_)
            | SessionError::SubjectMismatch => ErrorKind::Unauthenticated,
            SessionError::Creation(_) | SessionError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Creates, validates and revokes sessions.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<dyn SessionStore>,
    tokens: TokenService,
    session_ttl: Duration,
}

impl SessionManager {
    /// Create a session manager.
    ///
    /// `session_ttl_secs` governs the stored expiry; it is applied
    /// independently of the lifetime embedded in issued tokens.
    pub fn new(sessions: Arc<dyn SessionStore>, tokens: TokenService, session_ttl_secs: u64) -> Self {
        let secs = i64::try_from(session_ttl_secs).unwrap_or(i64::MAX);
        Self {
            sessions,
            tokens,
            session_ttl: Duration::try_seconds(secs).unwrap_or(Duration::MAX),
        }
    }

    /// The token service used for issuing and verifying tokens.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Issue a token for `user_id` and persist a new session.
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let token = self
            .tokens
            .issue(user_id)
            .map_err(|e| SessionError::Creation(CreationFailure::Token(e)))?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.session_ttl)
            .filter(|expires_at| *expires_at > now)
            .ok_or(SessionError::Creation(CreationFailure::InvalidExpiry))?;

        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at,
            created_at: now,
        };

        self.sessions
            .create(&session)
            .await
            .map_err(|e| SessionError::Creation(CreationFailure::Persist(e)))?;

        info!(
            user_id = %user_id,
            session_id = %session.id,
            token = %mask_token(&session.token),
            "Session created"
        );
        Ok(session)
    }

    /// Check a presented token against its stored session.
    ///
    /// An expired session is deleted before `Expired` is returned.
    pub async fn validate_session(&self, token: &str) -> Result<Session, SessionError> {
        if token.is_empty() {
            return Err(SessionError::NotFound);
        }

        let session = self
            .sessions
            .get_by_token(token)
            .await?
            .ok_or(SessionError::NotFound)?;

        if session.is_expired_at(Utc::now()) {
            debug!(
                session_id = %session.id,
                token = %mask_token(token),
                "Evicting expired session"
            );
            self.sessions.delete_by_token(token).await?;
            return Err(SessionError::Expired);
        }

        let subject = self
            .tokens
            .verify(token)
            .map_err(SessionError::TokenInvalid)?;

        if subject != session.user_id {
            warn!(
                session_id = %session.id,
                user_id = %session.user_id,
                "Token subject does not match session owner"
            );
            return Err(SessionError::SubjectMismatch);
        }

        Ok(session)
    }

    /// Revoke the session for `token`. Unknown tokens are not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), SessionError> {
        let deleted = self.sessions.delete_by_token(token).await?;
        if deleted {
            info!(token = %mask_token(token), "Session deleted");
        } else {
            debug!(token = %mask_token(token), "No session to delete");
        }
        Ok(())
    }

    /// Validate a bearer token and return the session owner.
    pub async fn authenticate(&self, token: &str) -> Result<Uuid, SessionError> {
        self.validate_session(token).await.map(|s| s.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use crate::db::{NewUser, SessionRepository, UserRepository, UserStore};
    use crate::Database;

    const SECRET: &str = "test-secret-key";

    struct Fixture {
        _db: Database,
        store: Arc<SessionRepository>,
        manager: SessionManager,
        alice: Uuid,
        bob: Uuid,
    }

    async fn setup_with_ttl(session_ttl_secs: u64) -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let alice = users
            .create(Uuid::new_v4(), &NewUser::new("alice", "a@x.io", "hash"))
            .await
            .unwrap()
            .id;
        let bob = users
            .create(Uuid::new_v4(), &NewUser::new("bob", "b@x.io", "hash"))
            .await
            .unwrap()
            .id;

        let store = Arc::new(SessionRepository::new(db.pool().clone()));
        let tokens = TokenService::new(SECRET, 3600).unwrap();
        let manager = SessionManager::new(store.clone(), tokens, session_ttl_secs);
        Fixture {
            _db: db,
            store,
            manager,
            alice,
            bob,
        }
    }

    async fn setup() -> Fixture {
        setup_with_ttl(DEFAULT_SESSION_TTL_SECS).await
    }

    #[tokio::test]
    async fn test_create_and_validate() {
        let f = setup().await;

        let session = f.manager.create_session(f.alice).await.unwrap();
        assert_eq!(session.user_id, f.alice);
        assert!(session.expires_at > session.created_at);
        assert_eq!(
            (session.expires_at - session.created_at).num_seconds(),
            DEFAULT_SESSION_TTL_SECS as i64
        );

        let validated = f.manager.validate_session(&session.token).await.unwrap();
        assert_eq!(validated, session);
        assert_eq!(f.manager.authenticate(&session.token).await.unwrap(), f.alice);
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_tokens() {
        let f = setup().await;
        let a = f.manager.create_session(f.alice).await.unwrap();
        let b = f.manager.create_session(f.alice).await.unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(f.store.get_by_user_id(f.alice).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_fails_creation() {
        let f = setup_with_ttl(0).await;
        let err = f.manager.create_session(f.alice).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Creation(CreationFailure::InvalidExpiry)
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_create_for_unknown_user_fails() {
        let f = setup().await;
        let err = f.manager.create_session(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Creation(CreationFailure::Persist(_))
        ));

        // The store error stays reachable through the source chain.
        let cause = err.source().unwrap();
        assert!(cause.downcast_ref::<CreationFailure>().is_some());
        let root = cause.source().unwrap();
        assert!(root.downcast_ref::<ChatError>().is_some());
    }

    #[tokio::test]
    async fn test_token_issue_failure_keeps_cause() {
        let f = setup().await;
        let tokens = TokenService::new(SECRET, u64::MAX).unwrap();
        let manager = SessionManager::new(f.store.clone(), tokens, DEFAULT_SESSION_TTL_SECS);

        let err = manager.create_session(f.alice).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        let cause = err.source().unwrap();
        let token_err = cause.source().unwrap().downcast_ref::<TokenError>().unwrap();
        assert!(matches!(token_err, TokenError::Signing(_)));
        assert!(f.store.get_by_user_id(f.alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_empty_token() {
        let f = setup().await;
        assert!(matches!(
            f.manager.validate_session("").await,
            Err(SessionError::NotFound)
        ));
        assert!(matches!(
            f.manager.validate_session("unknown").await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let f = setup().await;
        let token = f.manager.tokens().issue(f.alice).unwrap();
        let now = Utc::now();
        f.store
            .create(&Session {
                id: Uuid::new_v4(),
                user_id: f.alice,
                token: token.clone(),
                expires_at: now - Duration::seconds(1),
                created_at: now - Duration::hours(1),
            })
            .await
            .unwrap();

        let err = f.manager.validate_session(&token).await.unwrap_err();
        assert!(matches!(err, SessionError::Expired));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert!(f.store.get_by_token(&token).await.unwrap().is_none());

        // Once evicted, the token is simply unknown.
        assert!(matches!(
            f.manager.validate_session(&token).await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unverifiable_token() {
        let f = setup().await;
        let now = Utc::now();
        f.store
            .create(&Session {
                id: Uuid::new_v4(),
                user_id: f.alice,
                token: "not-a-jwt".to_string(),
                expires_at: now + Duration::hours(1),
                created_at: now,
            })
            .await
            .unwrap();

        let err = f.manager.validate_session("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, SessionError::TokenInvalid(_)));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret() {
        let f = setup().await;
        let foreign = TokenService::new("other-secret", 3600).unwrap();
        let token = foreign.issue(f.alice).unwrap();
        let now = Utc::now();
        f.store
            .create(&Session {
                id: Uuid::new_v4(),
                user_id: f.alice,
                token: token.clone(),
                expires_at: now + Duration::hours(1),
                created_at: now,
            })
            .await
            .unwrap();

        assert!(matches!(
            f.manager.validate_session(&token).await,
            Err(SessionError::TokenInvalid(TokenError::InvalidSignature))
        ));
    }

    #[tokio::test]
    async fn test_subject_mismatch() {
        let f = setup().await;
        let token = f.manager.tokens().issue(f.bob).unwrap();
        let now = Utc::now();
        f.store
            .create(&Session {
                id: Uuid::new_v4(),
                user_id: f.alice,
                token: token.clone(),
                expires_at: now + Duration::hours(1),
                created_at: now,
            })
            .await
            .unwrap();

        let err = f.manager.validate_session(&token).await.unwrap_err();
        assert!(matches!(err, SessionError::SubjectMismatch));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_delete_session_is_idempotent() {
        let f = setup().await;
        let session = f.manager.create_session(f.alice).await.unwrap();

        f.manager.delete_session(&session.token).await.unwrap();
        f.manager.delete_session(&session.token).await.unwrap();

        assert!(matches!(
            f.manager.validate_session(&session.token).await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_logout_leaves_other_sessions() {
        let f = setup().await;
        let first = f.manager.create_session(f.alice).await.unwrap();
        let second = f.manager.create_session(f.alice).await.unwrap();

        f.manager.delete_session(&first.token).await.unwrap();
        assert!(f.manager.validate_session(&second.token).await.is_ok());
    }
}
