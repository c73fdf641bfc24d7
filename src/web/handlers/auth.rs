//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{
    AckResponse, ApiResponse, AuthResponse, LoginRequest, RegisterRequest, RegisteredResponse,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/v1/register - Create an account and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; body is wrapped in `data`. A `RegisteredResponse` without a token is returned when no session could be opened", body = AuthResponse),
        (status = 400, description = "Malformed JSON", body = crate::web::error::ErrorBody),
        (status = 409, description = "Email or username already taken", body = crate::web::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::web::error::ErrorBody)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    let (user, session) = state
        .accounts
        .register_with_session(&req.username, &req.email, &req.password)
        .await?;

    let response = match session {
        Some(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::new(AuthResponse::new(user, session))),
        )
            .into_response(),
        None => (
            StatusCode::CREATED,
            Json(ApiResponse::new(RegisteredResponse::new(user))),
        )
            .into_response(),
    };
    Ok(response)
}

/// POST /api/v1/login - Log in and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; body is wrapped in `data`", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = crate::web::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::web::error::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let (user, session) = state
        .accounts
        .login_with_session(&req.email, &req.password)
        .await?;

    Ok(Json(ApiResponse::new(AuthResponse::new(user, session))))
}

/// POST /api/v1/logout - End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session ended", body = AckResponse),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody)
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AckResponse>>, ApiError> {
    state.accounts.sessions().delete_session(&auth.token).await?;
    Ok(Json(ApiResponse::new(AckResponse::new("Logged out successfully"))))
}
