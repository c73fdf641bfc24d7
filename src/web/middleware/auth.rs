//! Bearer session authentication.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::mask_token;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// The caller of a request that passed [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Session owner.
    pub user_id: Uuid,
    /// Session ID.
    pub session_id: Uuid,
    /// The presented bearer token.
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Set by require_session; absent means the route was not protected.
            parts
                .extensions
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(ApiError::invalid_session)
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a live session and attach [`AuthUser`] otherwise.
///
/// A missing header or a non-bearer scheme is rejected before the session
/// store is consulted.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            ApiError::invalid_session()
        })?
        .to_string();

    let session = state.accounts.sessions().validate_session(&token).await?;

    tracing::debug!(
        user_id = %session.user_id,
        token = %mask_token(&token),
        "Request authenticated"
    );

    request.extensions_mut().insert(AuthUser {
        user_id: session.user_id,
        session_id: session.id,
        token,
    });

    Ok(next.run(request).await)
}
