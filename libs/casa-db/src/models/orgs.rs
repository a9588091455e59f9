use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tenancy boundary: every user and case belongs to exactly one org.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CasaOrg {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub created_at: NaiveDateTime,
}
