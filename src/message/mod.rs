//! Message module for the chat service.
//!
//! This module provides message posting and retrieval:
//! - Message entity and creation data
//! - SQL repository implementing the message store
//! - Service with sender checks and owner-only deletion

mod repository;
mod service;
mod types;

pub use repository::MessageRepository;
pub use service::{MessageService, MAX_CONTENT_LENGTH};
pub use types::{Message, NewMessage};
