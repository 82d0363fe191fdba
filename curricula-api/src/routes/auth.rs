/// Authentication endpoints
///
/// - `POST {prefix}/auth/register` — create an account, returns a token
/// - `POST {prefix}/auth/login` — exchange credentials for a token
/// - `GET  {prefix}/auth/me` — the authenticated user
///
/// Self-registered accounts always start as learners; roles are assigned
/// afterwards by an admin. Accounts provisioned through the identity
/// provider have no password hash and cannot use password login.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::Duration;
use curricula_shared::{
    auth::{
        extract::CurrentUser,
        password,
        token::{issue_token, Claims},
    },
    models::user::{CreateUser, Role, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Token-bearing response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: &'static str,

    /// The account the token was issued for
    pub user: UserResponse,
}

fn issue_for(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = Claims::new(
        user.id,
        Some(user.email.clone()),
        Duration::minutes(state.config.auth.access_token_expire_minutes),
    );
    Ok(issue_token(
        &claims,
        &state.config.auth.secret_key,
        state.config.auth.algorithm,
    )?)
}

/// Registers a new account.
///
/// # Errors
///
/// - `422` — validation failed
/// - `409` — email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            role: Role::Learner,
            password_hash: Some(password_hash),
        },
    )
    .await?;

    let access_token = issue_for(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user: user.into(),
    }))
}

/// Exchanges email and password for an access token.
///
/// Unknown emails, wrong passwords, and accounts without a password hash
/// all answer the same 401 so the response does not reveal which part
/// failed.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    let digest = user.password_hash.as_deref().ok_or_else(invalid)?;
    if !password::verify_password(&req.password, digest)? {
        return Err(invalid());
    }

    let access_token = issue_for(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user: user.into(),
    }))
}

/// Returns the authenticated user.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
