/// Module endpoints
///
/// Modules are listed and created under their course
/// (`/courses/:course_id/modules`) and addressed directly for get, update
/// and delete (`/modules/:module_id`). Listing follows the course's
/// visibility: a draft course 404s for non-admins, so its modules do too.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::is_admin,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use curricula_shared::{
    auth::extract::{AdminUser, MaybeUser},
    models::{
        course::Course,
        module::{CreateModule, Module, UpdateModule},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Module creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    /// Display position within the course
    pub ord: i32,

    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "summary must be at most 2000 characters"))]
    pub summary: Option<String>,
}

/// Module update request (full overwrite of mutable fields)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    pub ord: i32,

    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "summary must be at most 2000 characters"))]
    pub summary: Option<String>,
}

/// Resolves a course the caller is allowed to see, or 404.
async fn visible_course(
    state: &AppState,
    course_id: Uuid,
    admin: bool,
) -> ApiResult<Course> {
    Course::find_by_id(&state.db, course_id)
        .await?
        .filter(|c| c.published || admin)
        .ok_or_else(|| ApiError::NotFound("course not found".to_string()))
}

/// Lists a course's modules in display order.
pub async fn list_modules(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Module>>> {
    let course = visible_course(&state, course_id, is_admin(user.as_ref())).await?;
    let modules = Module::list_by_course(&state.db, course.id).await?;
    Ok(Json(modules))
}

/// Creates a module under a course.
///
/// # Errors
///
/// - `404` — no such course
/// - `422` — validation failed
pub async fn create_module(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateModuleRequest>,
) -> ApiResult<Json<Module>> {
    req.validate()?;

    let course = Course::find_by_id(&state.db, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("course not found".to_string()))?;

    let module = Module::create(
        &state.db,
        CreateModule {
            course_id: course.id,
            ord: req.ord,
            title: req.title,
            summary: req.summary,
        },
    )
    .await?;

    Ok(Json(module))
}

/// Fetches a single module, honoring the parent course's visibility.
pub async fn get_module(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(module_id): Path<Uuid>,
) -> ApiResult<Json<Module>> {
    let module = Module::find_by_id(&state.db, module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("module not found".to_string()))?;

    visible_course(&state, module.course_id, is_admin(user.as_ref())).await?;

    Ok(Json(module))
}

/// Overwrites a module's mutable fields.
pub async fn update_module(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(module_id): Path<Uuid>,
    Json(req): Json<UpdateModuleRequest>,
) -> ApiResult<Json<Module>> {
    req.validate()?;

    let module = Module::update(
        &state.db,
        module_id,
        UpdateModule {
            ord: req.ord,
            title: req.title,
            summary: req.summary,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("module not found".to_string()))?;

    Ok(Json(module))
}

/// Deletes a module and its lessons.
pub async fn delete_module(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(module_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Module::delete(&state.db, module_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("module not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
