use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::orgs::CasaOrg;

#[derive(Clone, Debug)]
pub struct OrganizationRepository {
    pool: SqlitePool,
}

impl OrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, slug: Option<&str>) -> Result<CasaOrg> {
        sqlx::query_as::<_, CasaOrg>(
            "INSERT INTO casa_orgs (name, slug) VALUES (?, ?) RETURNING id, name, slug, created_at",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create organization")
    }

    pub async fn get_all(&self) -> Result<Vec<CasaOrg>> {
        sqlx::query_as::<_, CasaOrg>("SELECT * FROM casa_orgs ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch organizations")
    }
}
