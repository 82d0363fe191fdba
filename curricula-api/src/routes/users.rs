/// Admin user management
///
/// - `GET {prefix}/users` — paginated account listing
/// - `PUT {prefix}/users/:user_id/role` — assign a role
///
/// Both require the admin tier. Role values outside the closed set are
/// rejected by deserialization before the handler runs.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::UserResponse,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use curricula_shared::{
    auth::extract::AdminUser,
    models::user::{Role, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// User listing response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
}

/// Role assignment request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Lists accounts, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = User::list(&state.db, limit, offset).await?;
    let total = User::count(&state.db).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// Assigns a role to an account.
///
/// # Errors
///
/// - `404` — no such user
/// - `422` — unknown role value (rejected by deserialization)
pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::update_role(&state.db, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    tracing::info!(
        admin = %admin.id,
        user = %user.id,
        role = req.role.as_str(),
        "role assigned"
    );

    Ok(Json(user.into()))
}
