/// API route handlers
///
/// One module per resource:
///
/// - `health`: health check
/// - `auth`: register, login, current user
/// - `users`: admin user management
/// - `courses`, `modules`, `lessons`: content hierarchy CRUD
use curricula_shared::models::user::{Role, User};

pub mod auth;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod modules;
pub mod users;

/// Whether an optionally-resolved identity is an admin. Drafts and other
/// admin-only reads key off this.
pub(crate) fn is_admin(user: Option<&User>) -> bool {
    matches!(user, Some(u) if u.role == Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            name: "U".into(),
            role,
            password_hash: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(Some(&user(Role::Admin))));
        assert!(!is_admin(Some(&user(Role::Learner))));
        assert!(!is_admin(Some(&user(Role::Instructor))));
        assert!(!is_admin(None));
    }
}
