//! Message handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::AppState;
use crate::web::dto::{
    AckResponse, ApiResponse, CreateMessageRequest, MessageResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

fn parse_message_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid message ID"))
}

fn to_responses(messages: Vec<crate::message::Message>) -> Vec<MessageResponse> {
    messages.into_iter().map(MessageResponse::from).collect()
}

/// GET /api/v1/messages - All messages, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "messages",
    responses(
        (status = 200, description = "Messages; body is wrapped in `data`", body = [MessageResponse])
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ApiError> {
    let messages = state.messages.list_all().await?;
    Ok(Json(ApiResponse::new(to_responses(messages))))
}

/// POST /api/v1/messages - Post a message.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "messages",
    security(("bearer_auth" = [])),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message created; body is wrapped in `data`", body = MessageResponse),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::web::error::ErrorBody)
    )
)]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    let message = state.messages.create(auth.user_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(message.into()))))
}

/// GET /api/v1/messages/my - Messages sent by the current user.
#[utoipa::path(
    get,
    path = "/api/v1/messages/my",
    tag = "messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own messages; body is wrapped in `data`", body = [MessageResponse]),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody)
    )
)]
pub async fn my_messages(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ApiError> {
    let messages = state.messages.list_by_user(auth.user_id).await?;
    Ok(Json(ApiResponse::new(to_responses(messages))))
}

/// GET /api/v1/messages/:id - One message.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{id}",
    tag = "messages",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Message ID (UUID)")),
    responses(
        (status = 200, description = "Message; body is wrapped in `data`", body = MessageResponse),
        (status = 400, description = "Invalid message ID", body = crate::web::error::ErrorBody),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 404, description = "Message not found", body = crate::web::error::ErrorBody)
    )
)]
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_message_id(&id)?;
    let message = state.messages.get(id).await?;
    Ok(Json(ApiResponse::new(message.into())))
}

/// DELETE /api/v1/messages/:id - Delete one of the current user's messages.
#[utoipa::path(
    delete,
    path = "/api/v1/messages/{id}",
    tag = "messages",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Message ID (UUID)")),
    responses(
        (status = 200, description = "Message deleted", body = AckResponse),
        (status = 400, description = "Invalid message ID", body = crate::web::error::ErrorBody),
        (status = 401, description = "Invalid session", body = crate::web::error::ErrorBody),
        (status = 403, description = "Message belongs to another user", body = crate::web::error::ErrorBody),
        (status = 404, description = "Message not found", body = crate::web::error::ErrorBody)
    )
)]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AckResponse>>, ApiError> {
    let id = parse_message_id(&id)?;
    state.messages.delete(auth.user_id, id).await?;
    Ok(Json(ApiResponse::new(AckResponse::new("Message deleted successfully"))))
}
