/// Course endpoints
///
/// Reads are public — anonymous and non-admin callers see published
/// courses only, admins see drafts too. Writes require the admin tier.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::is_admin,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use curricula_shared::{
    auth::extract::{AdminUser, MaybeUser},
    models::course::{Course, CreateCourse, UpdateCourse},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn default_locale() -> String {
    "pt-BR".to_string()
}

/// Course creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    /// URL-friendly unique identifier
    #[validate(length(min = 1, max = 255, message = "slug must be 1-255 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    #[serde(default = "default_locale")]
    #[validate(length(min = 2, max = 10, message = "locale must be 2-10 characters"))]
    pub locale: String,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub published: bool,
}

/// Course update request (full overwrite of mutable fields)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,

    #[validate(length(min = 2, max = 10, message = "locale must be 2-10 characters"))]
    pub locale: String,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub published: bool,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    /// Exact slug lookup; answers with zero or one course
    pub slug: Option<String>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Course listing response
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<Course>,
    pub total: i64,
}

/// Lists courses, newest first. Drafts are visible to admins only.
pub async fn list_courses(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<ListCoursesQuery>,
) -> ApiResult<Json<CourseListResponse>> {
    let admin = is_admin(user.as_ref());

    if let Some(slug) = query.slug.as_deref() {
        let courses: Vec<Course> = Course::find_by_slug(&state.db, slug)
            .await?
            .filter(|c| c.published || admin)
            .into_iter()
            .collect();
        let total = courses.len() as i64;
        return Ok(Json(CourseListResponse { courses, total }));
    }

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let courses = Course::list(&state.db, !admin, limit, offset).await?;
    let total = Course::count(&state.db, !admin).await?;

    Ok(Json(CourseListResponse { courses, total }))
}

/// Fetches a single course. Unpublished courses 404 for non-admins.
pub async fn get_course(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Json<Course>> {
    let course = Course::find_by_id(&state.db, course_id)
        .await?
        .filter(|c| c.published || is_admin(user.as_ref()))
        .ok_or_else(|| ApiError::NotFound("course not found".to_string()))?;

    Ok(Json(course))
}

/// Creates a course.
///
/// # Errors
///
/// - `422` — validation failed
/// - `409` — slug already exists
pub async fn create_course(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<Json<Course>> {
    req.validate()?;

    let course = Course::create(
        &state.db,
        CreateCourse {
            slug: req.slug,
            title: req.title,
            locale: req.locale,
            description: req.description,
            published: req.published,
        },
    )
    .await?;

    Ok(Json(course))
}

/// Overwrites a course's mutable fields.
pub async fn update_course(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(course_id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<Json<Course>> {
    req.validate()?;

    let course = Course::update(
        &state.db,
        course_id,
        UpdateCourse {
            title: req.title,
            locale: req.locale,
            description: req.description,
            published: req.published,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("course not found".to_string()))?;

    Ok(Json(course))
}

/// Deletes a course and its modules and lessons.
pub async fn delete_course(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(course_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Course::delete(&state.db, course_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("course not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
