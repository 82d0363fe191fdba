/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`; the `IntoResponse` impl produces the status
/// code, a JSON body with a machine-checkable `error` code, and — for 401
/// responses — the `WWW-Authenticate: Bearer` challenge header.
///
/// # Example
///
/// ```ignore
/// async fn handler() -> ApiResult<Json<Course>> {
///     let course = Course::find_by_id(&pool, id)
///         .await?
///         .ok_or_else(|| ApiError::NotFound("course not found".to_string()))?;
///     Ok(Json(course))
/// }
/// ```
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401), answered with a Bearer challenge
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email or slug
    Conflict(String),

    /// Unprocessable entity (422), schema validation failures
    Validation(Vec<ValidationErrorDetail>),

    /// Internal server error (500); detail is logged, not exposed
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-checkable error code, e.g. "not_found"
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Per-field validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "conflict: {}", msg),
            ApiError::Validation(errors) => write!(f, "validation failed: {} errors", errors.len()),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique and foreign-key violations surface as conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("email already exists".to_string());
                    }
                    if constraint.contains("slug") {
                        return ApiError::Conflict("slug already exists".to_string());
                    }
                    return ApiError::Conflict(format!("constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<curricula_shared::auth::password::PasswordError> for ApiError {
    fn from(err: curricula_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("password operation failed: {}", err))
    }
}

/// Convert token errors to API errors
impl From<curricula_shared::auth::token::TokenError> for ApiError {
    fn from(err: curricula_shared::auth::token::TokenError) -> Self {
        use curricula_shared::auth::token::TokenError;
        match err {
            TokenError::Issue(msg) => ApiError::Internal(format!("token issuance failed: {}", msg)),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert validator failures to 422 responses with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "bad request: invalid input");

        let err = ApiError::NotFound("course not found".to_string());
        assert_eq!(err.to_string(), "not found: course not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation(vec![]).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = ApiError::Unauthorized("invalid email or password".into()).into_response();
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn test_other_statuses_have_no_challenge() {
        let response = ApiError::NotFound("x".into()).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
