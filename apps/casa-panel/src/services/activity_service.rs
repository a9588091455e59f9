use anyhow::{Context, Result};
use casa_db::models::activity::Activity;
use sqlx::SqlitePool;

pub struct ActivityService;

impl ActivityService {
    pub async fn log(pool: &SqlitePool, user_id: Option<i64>, action: &str, details: &str) -> Result<()> {
        sqlx::query("INSERT INTO activity_log (user_id, action, details) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(action)
            .bind(details)
            .execute(pool)
            .await
            .context("Failed to write activity log")?;
        Ok(())
    }

    pub async fn get_latest(pool: &SqlitePool, limit: i64) -> Result<Vec<Activity>> {
        sqlx::query_as::<_, Activity>(
            "SELECT * FROM activity_log ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to fetch activity log")
    }
}
