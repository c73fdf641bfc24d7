//! API handlers for the chat service.

pub mod auth;
pub mod health;
pub mod message;
pub mod user;

pub use auth::*;
pub use health::*;
pub use message::*;
pub use user::*;

use crate::auth::AccountManager;
use crate::message::MessageService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, profiles and sessions.
    pub accounts: AccountManager,
    /// Message posting and retrieval.
    pub messages: MessageService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(accounts: AccountManager, messages: MessageService) -> Self {
        Self { accounts, messages }
    }
}
