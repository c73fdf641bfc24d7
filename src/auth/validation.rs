//! Account field validation.
//!
//! This module provides validation functions for usernames, emails and
//! secrets. Lengths are counted in characters, not bytes.

use thiserror::Error;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Minimum secret length.
pub const MIN_SECRET_LENGTH: usize = 6;

/// Maximum secret length.
pub const MAX_SECRET_LENGTH: usize = 128;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username is required")]
    UsernameEmpty,

    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains control characters.
    #[error("username contains invalid characters")]
    UsernameInvalidChars,

    /// Email is empty.
    #[error("email is required")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Secret is too short.
    #[error("password must be at least {MIN_SECRET_LENGTH} characters")]
    SecretTooShort,

    /// Secret is too long.
    #[error("password must be at most {MAX_SECRET_LENGTH} characters")]
    SecretTooLong,
}

/// Validate a username.
///
/// Requirements:
/// - Not empty
/// - Length: 3-32 characters
/// - No control characters
///
/// # Examples
///
/// ```
/// use chat_service::auth::validation::validate_username;
///
/// assert!(validate_username("alice").is_ok());
/// assert!(validate_username("al").is_err()); // too short
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }

    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }

    if username.chars().any(|c| c.is_control()) {
        return Err(ValidationError::UsernameInvalidChars);
    }

    Ok(())
}

/// Validate an email address.
///
/// Performs a basic shape check: one `@`, a non-empty local part and a
/// dotted domain.
///
/// # Examples
///
/// ```
/// use chat_service::auth::validation::validate_email;
///
/// assert!(validate_email("a@x.io").is_ok());
/// assert!(validate_email("").is_err());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    // Domain needs a dot with text on both sides
    match domain.rsplit_once('.') {
        Some((name, tld)) if !name.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(ValidationError::EmailInvalidFormat),
    }
}

/// Validate a secret before hashing.
///
/// Requirements:
/// - Length: 6-128 characters
pub fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    let len = secret.chars().count();
    if len < MIN_SECRET_LENGTH {
        return Err(ValidationError::SecretTooShort);
    }
    if len > MAX_SECRET_LENGTH {
        return Err(ValidationError::SecretTooLong);
    }
    Ok(())
}

/// Validate all fields supplied at registration.
pub fn validate_registration(
    username: &str,
    email: &str,
    secret: &str,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_secret(secret)?;
    Ok(())
}
