use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::models::session::Session;

#[derive(Clone, Debug)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, token: &str, user_id: i64, expires_at: NaiveDateTime) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .context("Failed to create session")?;
        Ok(())
    }

    pub async fn get(&self, token: &str) -> Result<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch session")
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    pub async fn delete_expired(&self, now: NaiveDateTime) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to purge expired sessions")?;
        Ok(result.rows_affected())
    }
}
