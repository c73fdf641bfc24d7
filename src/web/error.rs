//! API error handling for the chat service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::auth::{AccountError, SessionError};
use crate::{ChatError, ErrorKind};

/// Message returned for every rejected bearer token.
pub const INVALID_SESSION_MESSAGE: &str = "Invalid session";

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Validation error (422).
    ValidationError,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Unauthenticated => ErrorCode::Unauthorized,
            ErrorKind::Forbidden => ErrorCode::Forbidden,
            ErrorKind::Internal => ErrorCode::InternalError,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation error details (only present for validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with field-level details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// The single response for any rejected session.
    pub fn invalid_session() -> Self {
        Self::unauthorized(INVALID_SESSION_MESSAGE)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error with field-level details.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self::with_details(ErrorCode::ValidationError, "Validation failed", details)
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self::validation(details)
    }

    /// Log the cause and hide it behind a generic message.
    fn internal_from(err: &dyn std::error::Error) -> Self {
        tracing::error!("Internal error: {}", err);
        ApiError::internal(INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err.kind() {
            ErrorKind::Internal => ApiError::internal_from(&err),
            kind => ApiError::new(kind.into(), err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err.kind() {
            ErrorKind::Unauthenticated => {
                tracing::debug!("Session rejected: {}", err);
                ApiError::invalid_session()
            }
            _ => ApiError::internal_from(&err),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidCredentials => ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE),
            AccountError::AlreadyExists => ApiError::conflict("User already exists"),
            AccountError::NotFound => ApiError::not_found("User not found"),
            AccountError::Validation(e) => {
                ApiError::new(ErrorCode::ValidationError, e.to_string())
            }
            AccountError::Session(e) => e.into(),
            AccountError::Store(e) => e.into(),
            AccountError::Hash(ref e) => ApiError::internal_from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{HashError, TokenError, ValidationError};

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_from_kind() {
        assert_eq!(ErrorCode::from(ErrorKind::Validation), ErrorCode::ValidationError);
        assert_eq!(ErrorCode::from(ErrorKind::NotFound), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from(ErrorKind::Conflict), ErrorCode::Conflict);
        assert_eq!(
            ErrorCode::from(ErrorKind::Unauthenticated),
            ErrorCode::Unauthorized
        );
        assert_eq!(ErrorCode::from(ErrorKind::Forbidden), ErrorCode::Forbidden);
        assert_eq!(ErrorCode::from(ErrorKind::Internal), ErrorCode::InternalError);
    }

    #[test]
    fn test_validation_error() {
        let mut details = HashMap::new();
        details.insert("username".to_string(), vec!["Too short".to_string()]);

        let err = ApiError::validation(details);
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Validation failed");
        assert_eq!(
            err.details.unwrap().get("username").unwrap(),
            &vec!["Too short".to_string()]
        );
    }

    #[test]
    fn test_session_errors_share_one_response() {
        let errors = [
            SessionError::NotFound,
            SessionError::Expired,
            SessionError::TokenInvalid(TokenError::InvalidSignature),
            SessionError::SubjectMismatch,
        ];
        for err in errors {
            let api: ApiError = err.into();
            assert_eq!(api.code(), ErrorCode::Unauthorized);
            assert_eq!(api.message(), INVALID_SESSION_MESSAGE);
        }
    }

    #[test]
    fn test_session_store_error_is_internal() {
        let api: ApiError = SessionError::Store(ChatError::Database("disk".into())).into();
        assert_eq!(api.code(), ErrorCode::InternalError);
        assert!(!api.message().contains("disk"));
    }

    #[test]
    fn test_account_errors() {
        let api: ApiError = AccountError::InvalidCredentials.into();
        assert_eq!(api.code(), ErrorCode::Unauthorized);
        assert_eq!(api.message(), INVALID_CREDENTIALS_MESSAGE);

        let api: ApiError = AccountError::AlreadyExists.into();
        assert_eq!(api.code(), ErrorCode::Conflict);

        let api: ApiError = AccountError::NotFound.into();
        assert_eq!(api.code(), ErrorCode::NotFound);

        let api: ApiError = AccountError::Validation(ValidationError::SecretTooShort).into();
        assert_eq!(api.code(), ErrorCode::ValidationError);

        let api: ApiError = AccountError::Hash(HashError::Hashing("boom".into())).into();
        assert_eq!(api.code(), ErrorCode::InternalError);
        assert!(!api.message().contains("boom"));
    }

    #[test]
    fn test_chat_errors() {
        let api: ApiError = ChatError::Permission("not yours".into()).into();
        assert_eq!(api.code(), ErrorCode::Forbidden);

        let api: ApiError = ChatError::NotFound("message".into()).into();
        assert_eq!(api.code(), ErrorCode::NotFound);
        assert_eq!(api.message(), "message not found");

        let api: ApiError = ChatError::Database("secret detail".into()).into();
        assert_eq!(api.code(), ErrorCode::InternalError);
        assert!(!api.message().contains("secret detail"));
    }
}
