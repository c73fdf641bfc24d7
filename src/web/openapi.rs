//! OpenAPI document for the chat API.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use super::dto::{
    AckResponse, AuthResponse, CreateMessageRequest, HealthResponse, LoginRequest,
    MessageResponse, RegisterRequest, RegisteredResponse, UpdateProfileRequest, UserResponse,
};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chat Service API",
        description = "Accounts, bearer sessions and chat messages"
    ),
    paths(
        super::handlers::health_check,
        super::handlers::register,
        super::handlers::login,
        super::handlers::logout,
        super::handlers::get_profile,
        super::handlers::update_profile,
        super::handlers::delete_profile,
        super::handlers::list_messages,
        super::handlers::create_message,
        super::handlers::my_messages,
        super::handlers::get_message,
        super::handlers::delete_message,
    ),
    components(schemas(
        HealthResponse,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        CreateMessageRequest,
        UserResponse,
        AuthResponse,
        RegisteredResponse,
        MessageResponse,
        AckResponse,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, login and logout"),
        (name = "profile", description = "The current user's account"),
        (name = "messages", description = "Chat messages"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
