/// Course model and database operations
///
/// A course is the top of the content hierarchy: courses contain modules,
/// modules contain lessons. The slug is the course's stable public handle
/// and is unique across all courses.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Course record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,

    /// URL-friendly unique identifier; immutable after creation
    pub slug: String,

    pub title: String,

    /// BCP 47-ish locale code, e.g. "pt-BR"
    pub locale: String,

    pub description: Option<String>,

    /// Unpublished courses are visible to admins only
    pub published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a course
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub slug: String,
    pub title: String,
    pub locale: String,
    pub description: Option<String>,
    pub published: bool,
}

/// Input for updating a course's mutable fields (full overwrite)
#[derive(Debug, Clone)]
pub struct UpdateCourse {
    pub title: String,
    pub locale: String,
    pub description: Option<String>,
    pub published: bool,
}

impl Course {
    /// Inserts a new course.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation when the slug is taken.
    pub async fn create(pool: &PgPool, data: CreateCourse) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (slug, title, locale, description, published)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, slug, title, locale, description, published, created_at, updated_at
            "#,
        )
        .bind(data.slug)
        .bind(data.title)
        .bind(data.locale)
        .bind(data.description)
        .bind(data.published)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, slug, title, locale, description, published, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, slug, title, locale, description, published, created_at, updated_at
            FROM courses
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Lists courses, newest first. With `published_only`, drafts are
    /// filtered out.
    pub async fn list(
        pool: &PgPool,
        published_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, slug, title, locale, description, published, created_at, updated_at
            FROM courses
            WHERE (NOT $1) OR published
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(published_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool, published_only: bool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM courses WHERE (NOT $1) OR published")
                .bind(published_only)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Overwrites the mutable fields, `None` when the course does not
    /// exist. The slug is intentionally not updatable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCourse,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = $2, locale = $3, description = $4, published = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, locale, description, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.locale)
        .bind(data.description)
        .bind(data.published)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a course and, via cascade, its modules and lessons.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
