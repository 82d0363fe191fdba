/// Module model and database operations
///
/// Modules sit between courses and lessons and carry an `ord` column that
/// fixes their display order within the parent course. `ord` is indexed
/// but deliberately not unique; display order is `ORDER BY ord,
/// created_at` so ties resolve deterministically.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Module record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Module {
    pub id: Uuid,

    /// Parent course
    pub course_id: Uuid,

    /// Display position within the course
    pub ord: i32,

    pub title: String,
    pub summary: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a module
#[derive(Debug, Clone)]
pub struct CreateModule {
    pub course_id: Uuid,
    pub ord: i32,
    pub title: String,
    pub summary: Option<String>,
}

/// Input for updating a module's mutable fields (full overwrite)
#[derive(Debug, Clone)]
pub struct UpdateModule {
    pub ord: i32,
    pub title: String,
    pub summary: Option<String>,
}

impl Module {
    /// Inserts a new module.
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation when the course does not exist.
    pub async fn create(pool: &PgPool, data: CreateModule) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (course_id, ord, title, summary)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, ord, title, summary, created_at, updated_at
            "#,
        )
        .bind(data.course_id)
        .bind(data.ord)
        .bind(data.title)
        .bind(data.summary)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Module>(
            r#"
            SELECT id, course_id, ord, title, summary, created_at, updated_at
            FROM modules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a course's modules in display order.
    pub async fn list_by_course(pool: &PgPool, course_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Module>(
            r#"
            SELECT id, course_id, ord, title, summary, created_at, updated_at
            FROM modules
            WHERE course_id = $1
            ORDER BY ord, created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrites the mutable fields, `None` when the module does not
    /// exist. The parent course is immutable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateModule,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Module>(
            r#"
            UPDATE modules
            SET ord = $2, title = $3, summary = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, course_id, ord, title, summary, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.ord)
        .bind(data.title)
        .bind(data.summary)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a module and, via cascade, its lessons.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
