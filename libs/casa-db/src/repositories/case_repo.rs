use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::casa_case::CasaCase;

#[derive(Clone, Debug)]
pub struct CaseRepository {
    pool: SqlitePool,
}

impl CaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, casa_org_id: i64, case_number: &str) -> Result<CasaCase> {
        sqlx::query_as::<_, CasaCase>(
            r#"
            INSERT INTO casa_cases (casa_org_id, case_number)
            VALUES (?, ?)
            RETURNING id, casa_org_id, case_number, created_at
            "#,
        )
        .bind(casa_org_id)
        .bind(case_number)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create case")
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CasaCase>> {
        sqlx::query_as::<_, CasaCase>("SELECT * FROM casa_cases WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch case")
    }

    pub async fn list_for_org(&self, casa_org_id: i64) -> Result<Vec<CasaCase>> {
        sqlx::query_as::<_, CasaCase>(
            "SELECT * FROM casa_cases WHERE casa_org_id = ? ORDER BY case_number ASC",
        )
        .bind(casa_org_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch organization cases")
    }

    /// Cases a volunteer is actively assigned to.
    pub async fn list_for_volunteer(&self, volunteer_id: i64) -> Result<Vec<CasaCase>> {
        sqlx::query_as::<_, CasaCase>(
            r#"
            SELECT c.* FROM casa_cases c
            JOIN case_assignments ca ON ca.casa_case_id = c.id
            WHERE ca.volunteer_id = ? AND ca.active = 1
            ORDER BY c.case_number ASC
            "#,
        )
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch volunteer cases")
    }

    pub async fn assign_volunteer(&self, casa_case_id: i64, volunteer_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO case_assignments (casa_case_id, volunteer_id)
            VALUES (?, ?)
            ON CONFLICT(casa_case_id, volunteer_id) DO UPDATE SET active = 1
            "#,
        )
        .bind(casa_case_id)
        .bind(volunteer_id)
        .execute(&self.pool)
        .await
        .context("Failed to assign volunteer to case")?;
        Ok(())
    }
}
