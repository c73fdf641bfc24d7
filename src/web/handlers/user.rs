//! Profile handlers for the authenticated user.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::auth::ProfileUpdate;
use crate::web::dto::{AckResponse, ApiResponse, UpdateProfileRequest, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// GET /api/v1/profile - Current user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile; body is wrapped in `data`", body = UserResponse),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 404, description = "Account no longer exists", body = crate::web::error::ErrorBody)
    )
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.accounts.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

/// PUT /api/v1/profile - Change username and/or email.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile; body is wrapped in `data`", body = UserResponse),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 409, description = "Email or username already taken", body = crate::web::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::web::error::ErrorBody)
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let update = ProfileUpdate {
        username: req.username,
        email: req.email,
    };
    let user = state.accounts.update_profile(auth.user_id, update).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

/// DELETE /api/v1/profile - Delete the account with its sessions and messages.
#[utoipa::path(
    delete,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = AckResponse),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 404, description = "Account no longer exists", body = crate::web::error::ErrorBody)
    )
)]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AckResponse>>, ApiError> {
    state.accounts.delete_user(auth.user_id).await?;
    Ok(Json(ApiResponse::new(AckResponse::new("Account deleted successfully"))))
}
