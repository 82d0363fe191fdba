/// Lesson endpoints
///
/// Lessons are listed and created under their module
/// (`/modules/:module_id/lessons`) and addressed directly for get, update
/// and delete (`/lessons/:lesson_id`). Unpublished lessons are visible to
/// admins only.
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
        lesson::{ContentType, CreateLesson, Lesson, UpdateLesson},
        module::Module,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

fn default_content_type() -> ContentType {
    ContentType::Text
}

/// Lesson creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    /// URL-friendly identifier, scoped to the module
    #[validate(length(min = 1, max = 255, message = "slug must be 1-255 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    #[serde(default = "default_content_type")]
    pub content_type: ContentType,

    #[validate(length(max = 1000, message = "md_url must be at most 1000 characters"))]
    pub md_url: Option<String>,

    #[validate(length(max = 1000, message = "video_url must be at most 1000 characters"))]
    pub video_url: Option<String>,

    #[validate(range(min = 0, message = "duration_minutes must not be negative"))]
    pub duration_minutes: Option<i32>,

    /// Display position within the module
    pub ord: i32,

    #[serde(default)]
    pub published: bool,
}

/// Lesson update request (full overwrite of mutable fields)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    pub content_type: ContentType,

    #[validate(length(max = 1000, message = "md_url must be at most 1000 characters"))]
    pub md_url: Option<String>,

    #[validate(length(max = 1000, message = "video_url must be at most 1000 characters"))]
    pub video_url: Option<String>,

    #[validate(range(min = 0, message = "duration_minutes must not be negative"))]
    pub duration_minutes: Option<i32>,

    pub ord: i32,

    pub published: bool,
}

/// Lists a module's lessons in display order. Drafts are filtered out
/// for non-admin callers.
pub async fn list_lessons(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(module_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Lesson>>> {
    let module = Module::find_by_id(&state.db, module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("module not found".to_string()))?;

    let admin = is_admin(user.as_ref());
    let lessons = Lesson::list_by_module(&state.db, module.id, !admin).await?;
    Ok(Json(lessons))
}

/// Creates a lesson under a module.
///
/// # Errors
///
/// - `404` — no such module
/// - `422` — validation failed
pub async fn create_lesson(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(module_id): Path<Uuid>,
    Json(req): Json<CreateLessonRequest>,
) -> ApiResult<Json<Lesson>> {
    req.validate()?;

    let module = Module::find_by_id(&state.db, module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("module not found".to_string()))?;

    let lesson = Lesson::create(
        &state.db,
        CreateLesson {
            module_id: module.id,
            slug: req.slug,
            title: req.title,
            content_type: req.content_type,
            md_url: req.md_url,
            video_url: req.video_url,
            duration_minutes: req.duration_minutes,
            ord: req.ord,
            published: req.published,
        },
    )
    .await?;

    Ok(Json(lesson))
}

/// Fetches a single lesson. Unpublished lessons 404 for non-admins.
pub async fn get_lesson(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(lesson_id): Path<Uuid>,
) -> ApiResult<Json<Lesson>> {
    let lesson = Lesson::find_by_id(&state.db, lesson_id)
        .await?
        .filter(|l| l.published || is_admin(user.as_ref()))
        .ok_or_else(|| ApiError::NotFound("lesson not found".to_string()))?;

    Ok(Json(lesson))
}

/// Overwrites a lesson's mutable fields.
pub async fn update_lesson(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(lesson_id): Path<Uuid>,
    Json(req): Json<UpdateLessonRequest>,
) -> ApiResult<Json<Lesson>> {
    req.validate()?;

    let lesson = Lesson::update(
        &state.db,
        lesson_id,
        UpdateLesson {
            title: req.title,
            content_type: req.content_type,
            md_url: req.md_url,
            video_url: req.video_url,
            duration_minutes: req.duration_minutes,
            ord: req.ord,
            published: req.published,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("lesson not found".to_string()))?;

    Ok(Json(lesson))
}

/// Deletes a lesson.
pub async fn delete_lesson(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(lesson_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Lesson::delete(&state.db, lesson_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("lesson not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
