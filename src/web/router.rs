//! Router configuration for the chat API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    create_message, delete_message, delete_profile, get_message, get_profile, health_check,
    list_messages, login, logout, my_messages, register, update_profile, AppState,
};
use super::middleware::{create_cors_layer, require_session, security_headers};
use super::openapi::ApiDoc;
use crate::config::ServerConfig;

/// Create the `/api/v1` router.
///
/// Requests to protected routes are rejected by [`require_session`] before
/// any handler runs.
pub fn create_api_router(app_state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/messages", get(list_messages));

    let protected_routes = Router::new()
        .route("/logout", post(logout))
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/messages", post(create_message))
        .route("/messages/my", get(my_messages))
        .route("/messages/:id", get(get_message).delete(delete_message))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// Create the full application router with its middleware stack.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .nest("/api/v1", create_api_router(app_state))
        .merge(create_health_router())
        .merge(create_swagger_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        )
}
