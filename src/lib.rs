//! Chat service
//!
//! A multi-user chat backend: accounts with Argon2 password hashing,
//! signed bearer tokens bound to stored sessions, and message posting
//! over an HTTP API backed by SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod message;
pub mod web;

pub use auth::{AccountManager, CredentialHasher, SessionManager, TokenService};
pub use config::Config;
pub use db::Database;
pub use error::{ChatError, ErrorKind, Result};
pub use message::MessageService;
pub use web::{AppState, WebServer};
