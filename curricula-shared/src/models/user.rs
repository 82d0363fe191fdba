/// User model and database operations
///
/// Users are learners, instructors, or admins. Accounts created through
/// the external identity provider carry no password hash; password login
/// is only possible for accounts that have one.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('learner', 'instructor', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'learner',
///     password_hash VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account roles
///
/// A closed set: unknown strings are rejected at deserialization and at
/// [`Role::from_str`], so a mistyped role can neither be stored nor grant
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role for self-registered accounts
    Learner,

    /// Can author content (reserved; no extra privileges yet)
    Instructor,

    /// Full administrative access
    Admin,
}

/// Error for unknown role strings
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learner" => Ok(Role::Learner),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (UUID v4, server-generated)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,

    /// Account role
    pub role: Role,

    /// Argon2id digest; None for identity-provider-only accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Already-hashed digest, never a plaintext password
    pub password_hash: Option<String>,
}

/// Input for updating a user's mutable profile fields
///
/// Updates overwrite the full set of mutable fields; timestamps are
/// maintained by the database.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub email: String,
    pub name: String,
}

impl User {
    /// Inserts a new user, returning the stored record with generated id
    /// and timestamps.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation when the email is taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, password_hash, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.role)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by id, `None` when absent.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email, `None` when absent.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Lists users, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts all users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Overwrites the mutable profile fields, `None` when the user does
    /// not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, role, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.email)
        .bind(data.name)
        .fetch_optional(pool)
        .await
    }

    /// Assigns a new role, `None` when the user does not exist.
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: Role,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, role, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("learner").unwrap(), Role::Learner);
        assert_eq!(Role::from_str("instructor").unwrap(), Role::Instructor);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_rejects_unknown_strings() {
        for bad in ["", "Admin", "superuser", "admn", "learner "] {
            assert!(Role::from_str(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_role_serde_roundtrip() {
        let json = serde_json::to_string(&Role::Instructor).unwrap();
        assert_eq!(json, "\"instructor\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Instructor);
    }

    #[test]
    fn test_role_serde_rejects_unknown() {
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
        assert!(serde_json::from_str::<Role>("\"ADMIN\"").is_err());
    }

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            name: "A".into(),
            role: Role::Learner,
            password_hash: Some("$argon2id$...".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "learner");
    }

    // Database-backed CRUD coverage lives in integration tests that run
    // against a provisioned Postgres.
}
