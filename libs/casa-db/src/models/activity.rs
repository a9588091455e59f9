use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}
