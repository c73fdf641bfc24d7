//! Request body validation for the chat API.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Malformed JSON is answered with 400; a body that parses but breaks a
/// field rule is answered with 422 and per-field details.
///
/// ```ignore
/// async fn create_message(
///     ValidatedJson(req): ValidatedJson<CreateMessageRequest>,
/// ) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
///     // req is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_blank")
            .with_message("Must not be blank".into()));
    }
    Ok(())
}

/// Validate that a single-line field has no control characters.
pub fn single_line(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(validator::ValidationError::new("single_line")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request as HttpRequest, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Too short"))]
        name: String,
    }

    async fn probe(ValidatedJson(body): ValidatedJson<Probe>) -> String {
        body.name
    }

    async fn send(body: &'static str) -> StatusCode {
        Router::new()
            .route("/", post(probe))
            .oneshot(
                HttpRequest::post("/")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert_eq!(send(r#"{"name":"alice"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        assert_eq!(send(r#"{"name":"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rule_violation_is_unprocessable() {
        assert_eq!(
            send(r#"{"name":"al"}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("  hi  ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n").is_err());
    }

    #[test]
    fn test_single_line() {
        assert!(single_line("alice").is_ok());
        assert!(single_line("ali\nce").is_err());
        assert!(single_line("a\x00b").is_err());
    }
}
