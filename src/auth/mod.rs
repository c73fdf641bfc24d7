//! Authentication module for the chat service.
//!
//! This module provides credential hashing, signed bearer tokens, the
//! session lifecycle and account management.

mod account;
mod password;
mod session;
mod token;
pub mod validation;

pub use account::{AccountError, AccountManager, ProfileUpdate};
pub use password::{CredentialHasher, HashError};
pub use session::{CreationFailure, SessionError, SessionManager, DEFAULT_SESSION_TTL_SECS};
pub use token::{mask_token, Claims, TokenError, TokenService, DEFAULT_TOKEN_TTL_SECS};
pub use validation::ValidationError;
