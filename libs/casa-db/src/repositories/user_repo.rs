use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::user::{NewUser, Role, User};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (casa_org_id, role, email, display_name, password_hash)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user.casa_org_id)
        .bind(user.role.as_str())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create user")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by ID")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")
    }

    pub async fn list_by_role(&self, casa_org_id: i64, role: Role) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE casa_org_id = ? AND role = ? ORDER BY display_name ASC",
        )
        .bind(casa_org_id)
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users by role")
    }

    /// True when a user other than `except_id` already owns `email` (case-insensitive).
    pub async fn email_taken(&self, email: &str, except_id: i64) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)")
            .bind(email)
            .bind(except_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check email uniqueness")
    }

    pub async fn update_profile(&self, id: i64, email: &str, display_name: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = ?, display_name = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to update user profile")
    }

    /// Returns false when no user has that email.
    pub async fn set_password_hash(&self, email: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = CURRENT_TIMESTAMP WHERE email = ?",
        )
        .bind(password_hash)
        .bind(email)
        .execute(&self.pool)
        .await
        .context("Failed to update password")?;
        Ok(result.rows_affected() > 0)
    }
}
