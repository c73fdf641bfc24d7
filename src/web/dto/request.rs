//! Request DTOs for the chat API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{not_blank, single_line};

/// Registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name (3-32 characters).
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        custom(function = "single_line")
    )]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password (6-128 characters).
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request. Omitted or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(default)]
    #[validate(custom(function = "single_line"))]
    pub username: Option<String>,
    /// New email address.
    #[serde(default)]
    #[validate(custom(function = "single_line"))]
    pub email: Option<String>,
}

/// Message creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    /// Message text (1-1000 characters).
    #[validate(
        length(min = 1, max = 1000, message = "Content must be 1-1000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,
}
