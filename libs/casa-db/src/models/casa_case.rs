use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CasaCase {
    pub id: i64,
    pub casa_org_id: i64,
    pub case_number: String,
    pub created_at: NaiveDateTime,
}

