/// Request authentication extractors
///
/// Three tiers of axum extractors resolve the caller's identity from the
/// `Authorization: Bearer <token>` header, each built on the one below it
/// so credentials are parsed exactly once per request:
///
/// - [`MaybeUser`] — optional identity. No header at all is a success with
///   no identity; a header that is present but unusable is a 401.
/// - [`CurrentUser`] — required identity. Built on `MaybeUser`; an absent
///   identity becomes a 401.
/// - [`AdminUser`] — required admin identity. Built on `CurrentUser`; a
///   non-admin role becomes a 403.
///
/// Every 401 carries a `WWW-Authenticate: Bearer` challenge and a
/// machine-checkable `error` code in the JSON body; a lower tier's failure
/// is propagated unchanged by the tiers above it.
///
/// The extractors are generic over an [`AuthState`] implemented by the API
/// server's state type, which supplies the database pool and the token
/// verification parameters.
///
/// # Example
///
/// ```no_run
/// use curricula_shared::auth::extract::{CurrentUser, MaybeUser};
///
/// async fn me(CurrentUser(user): CurrentUser) -> String {
///     format!("hello, {}", user.name)
/// }
///
/// async fn catalog(MaybeUser(user): MaybeUser) -> &'static str {
///     if user.is_some() { "member view" } else { "public view" }
/// }
/// ```
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::Algorithm;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::token::{self, Claims, TokenError};
use crate::models::user::{Role, User};

/// State requirements of the auth extractors
///
/// The API server's shared state implements this; keeping it a trait seam
/// means this crate does not depend on the server's concrete state type.
pub trait AuthState: Send + Sync {
    /// Database pool used to resolve the token subject to a stored user.
    fn db(&self) -> &PgPool;

    /// Symmetric secret tokens are signed with.
    fn token_secret(&self) -> &str;

    /// Signing algorithm tokens are verified against.
    fn token_algorithm(&self) -> Algorithm;
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header present but not a Bearer credential
    #[error("expected a Bearer token in the Authorization header")]
    InvalidScheme,

    /// Token failed signature, expiry, or payload checks
    #[error("invalid authentication credentials: {0}")]
    InvalidToken(#[from] TokenError),

    /// Token payload carries no subject claim
    #[error("token payload has no subject claim")]
    MissingSubject,

    /// Subject claim is not a valid user id
    #[error("token subject is not a valid user id")]
    MalformedSubject,

    /// No credentials on a route that requires them
    #[error("not authenticated")]
    NotAuthenticated,

    /// Authenticated identity lacks the admin role
    #[error("admin role required")]
    AdminRequired,

    /// Lookup of the token subject failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Stable machine-checkable code used in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidScheme => "invalid_scheme",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::MissingSubject => "missing_subject",
            AuthError::MalformedSubject => "malformed_subject",
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::AdminRequired => "admin_required",
            AuthError::Database(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::AdminRequired => StatusCode::FORBIDDEN,
            AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Lookup failures are logged, not leaked.
            AuthError::Database(e) => {
                tracing::error!("user lookup failed during authentication: {}", e);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(AuthErrorBody {
            error: self.code(),
            message,
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

/// Tier 0: optional identity.
///
/// Resolution, in order:
/// 1. no `Authorization` header → `MaybeUser(None)`;
/// 2. header present but not `Bearer <token>` → 401 `invalid_scheme`;
/// 3. token fails verification → 401 `invalid_token`;
/// 4. payload has no subject → 401 `missing_subject`;
/// 5. subject is not a UUID → 401 `malformed_subject`;
/// 6. subject has no row in `users` → `MaybeUser(None)`;
/// 7. otherwise → `MaybeUser(Some(user))`.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Tier 1: required identity. Absent identity is a 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Tier 2: required admin identity. Non-admin role is a 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Parses the subject claim into a user id.
pub(crate) fn subject_id(claims: &Claims) -> Result<Uuid, AuthError> {
    if claims.sub.is_empty() {
        return Err(AuthError::MissingSubject);
    }
    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedSubject)
}

/// Requires the admin role on an already-resolved identity.
pub(crate) fn ensure_admin(user: &User) -> Result<(), AuthError> {
    if user.role != Role::Admin {
        return Err(AuthError::AdminRequired);
    }
    Ok(())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: AuthState,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthError::InvalidScheme)?;

        let claims = token::verify_token(token, state.token_secret(), state.token_algorithm())?;
        let user_id = subject_id(&claims)?;

        // A verified token whose subject is unknown to storage resolves to
        // no identity, not an error.
        let user = User::find_by_id(state.db(), user_id).await?;

        Ok(MaybeUser(user))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: AuthState,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(CurrentUser).ok_or(AuthError::NotAuthenticated)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: AuthState,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        ensure_admin(&user)?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            name: "Test User".to_string(),
            role,
            password_hash: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject_id_valid() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, None, Duration::minutes(5));
        assert_eq!(subject_id(&claims).unwrap(), id);
    }

    #[test]
    fn test_subject_id_missing() {
        let mut claims = Claims::new(Uuid::new_v4(), None, Duration::minutes(5));
        claims.sub = String::new();
        assert!(matches!(subject_id(&claims), Err(AuthError::MissingSubject)));
    }

    #[test]
    fn test_subject_id_malformed() {
        let mut claims = Claims::new(Uuid::new_v4(), None, Duration::minutes(5));
        claims.sub = "not-a-uuid".to_string();
        assert!(matches!(
            subject_id(&claims),
            Err(AuthError::MalformedSubject)
        ));
    }

    #[test]
    fn test_ensure_admin_accepts_admin() {
        let user = user_with_role(Role::Admin);
        assert!(ensure_admin(&user).is_ok());
    }

    #[test]
    fn test_ensure_admin_rejects_other_roles() {
        for role in [Role::Learner, Role::Instructor] {
            let user = user_with_role(role);
            assert!(matches!(ensure_admin(&user), Err(AuthError::AdminRequired)));
        }
    }

    #[test]
    fn test_unauthorized_responses_carry_challenge() {
        for err in [
            AuthError::InvalidScheme,
            AuthError::NotAuthenticated,
            AuthError::MissingSubject,
            AuthError::MalformedSubject,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response
                    .headers()
                    .get(header::WWW_AUTHENTICATE)
                    .and_then(|v| v.to_str().ok()),
                Some("Bearer")
            );
        }
    }

    #[test]
    fn test_forbidden_response_has_no_challenge() {
        let response = AuthError::AdminRequired.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AuthError::InvalidScheme.code(), "invalid_scheme");
        assert_eq!(AuthError::MissingSubject.code(), "missing_subject");
        assert_eq!(AuthError::MalformedSubject.code(), "malformed_subject");
        assert_eq!(AuthError::NotAuthenticated.code(), "not_authenticated");
        assert_eq!(AuthError::AdminRequired.code(), "admin_required");
    }
}
