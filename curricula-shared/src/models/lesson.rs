/// Lesson model and database operations
///
/// Lessons are the leaves of the content hierarchy. Content lives outside
/// the database: `md_url` points at markdown, `video_url` at a video
/// asset; either may be absent depending on the content type. The lesson
/// slug is scoped to its module, not globally unique.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lesson content types
///
/// Closed set like [`crate::models::user::Role`]; unknown strings are
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lesson_content_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Text,
    Quiz,
    Lab,
    Interactive,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Text => "text",
            ContentType::Quiz => "quiz",
            ContentType::Lab => "lab",
            ContentType::Interactive => "interactive",
        }
    }
}

/// Lesson record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    pub id: Uuid,

    /// Parent module
    pub module_id: Uuid,

    /// URL-friendly identifier, scoped to the module
    pub slug: String,

    pub title: String,

    pub content_type: ContentType,

    /// Markdown content location
    pub md_url: Option<String>,

    /// Video content location
    pub video_url: Option<String>,

    /// Estimated duration in minutes
    pub duration_minutes: Option<i32>,

    /// Display position within the module
    pub ord: i32,

    /// Unpublished lessons are visible to admins only
    pub published: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a lesson
#[derive(Debug, Clone)]
pub struct CreateLesson {
    pub module_id: Uuid,
    pub slug: String,
    pub title: String,
    pub content_type: ContentType,
    pub md_url: Option<String>,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub ord: i32,
    pub published: bool,
}

/// Input for updating a lesson's mutable fields (full overwrite)
#[derive(Debug, Clone)]
pub struct UpdateLesson {
    pub title: String,
    pub content_type: ContentType,
    pub md_url: Option<String>,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub ord: i32,
    pub published: bool,
}

impl Lesson {
    /// Inserts a new lesson.
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation when the module does not exist.
    pub async fn create(pool: &PgPool, data: CreateLesson) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons
                (module_id, slug, title, content_type, md_url, video_url, duration_minutes, ord, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, module_id, slug, title, content_type, md_url, video_url,
                      duration_minutes, ord, published, created_at, updated_at
            "#,
        )
        .bind(data.module_id)
        .bind(data.slug)
        .bind(data.title)
        .bind(data.content_type)
        .bind(data.md_url)
        .bind(data.video_url)
        .bind(data.duration_minutes)
        .bind(data.ord)
        .bind(data.published)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, module_id, slug, title, content_type, md_url, video_url,
                   duration_minutes, ord, published, created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a module's lessons in display order. With `published_only`,
    /// drafts are filtered out.
    pub async fn list_by_module(
        pool: &PgPool,
        module_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, module_id, slug, title, content_type, md_url, video_url,
                   duration_minutes, ord, published, created_at, updated_at
            FROM lessons
            WHERE module_id = $1 AND ((NOT $2) OR published)
            ORDER BY ord, created_at
            "#,
        )
        .bind(module_id)
        .bind(published_only)
        .fetch_all(pool)
        .await
    }

    /// Overwrites the mutable fields, `None` when the lesson does not
    /// exist. The parent module and the slug are immutable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateLesson,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET title = $2, content_type = $3, md_url = $4, video_url = $5,
                duration_minutes = $6, ord = $7, published = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, module_id, slug, title, content_type, md_url, video_url,
                      duration_minutes, ord, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.content_type)
        .bind(data.md_url)
        .bind(data.video_url)
        .bind(data.duration_minutes)
        .bind(data.ord)
        .bind(data.published)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serde() {
        assert_eq!(
            serde_json::to_string(&ContentType::Video).unwrap(),
            "\"video\""
        );
        let back: ContentType = serde_json::from_str("\"lab\"").unwrap();
        assert_eq!(back, ContentType::Lab);
    }

    #[test]
    fn test_content_type_rejects_unknown() {
        assert!(serde_json::from_str::<ContentType>("\"podcast\"").is_err());
        assert!(serde_json::from_str::<ContentType>("\"Video\"").is_err());
    }

    #[test]
    fn test_content_type_as_str() {
        for (ct, s) in [
            (ContentType::Video, "video"),
            (ContentType::Text, "text"),
            (ContentType::Quiz, "quiz"),
            (ContentType::Lab, "lab"),
            (ContentType::Interactive, "interactive"),
        ] {
            assert_eq!(ct.as_str(), s);
        }
    }
}
