//! HTTP API for the chat service.
//!
//! Routes live under `/api/v1`. Protected routes require an
//! `Authorization: Bearer <token>` header naming a live session.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use openapi::ApiDoc;
pub use router::create_router;
pub use server::{shutdown_signal, WebServer};
