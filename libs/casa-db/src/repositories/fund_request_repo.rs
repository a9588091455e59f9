use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::fund_request::{FundRequest, NewFundRequest};

#[derive(Clone, Debug)]
pub struct FundRequestRepository {
    pool: SqlitePool,
}

impl FundRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        casa_case_id: i64,
        user_id: i64,
        input: &NewFundRequest,
    ) -> Result<FundRequest> {
        sqlx::query_as::<_, FundRequest>(
            r#"
            INSERT INTO fund_requests (
                casa_case_id, user_id, submitter_email, youth_name, payment_amount, deadline,
                request_purpose, payee_name, requested_by_and_relationship,
                other_funding_source_sought, impact, extra_information
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(casa_case_id)
        .bind(user_id)
        .bind(&input.submitter_email)
        .bind(&input.youth_name)
        .bind(&input.payment_amount)
        .bind(&input.deadline)
        .bind(&input.request_purpose)
        .bind(&input.payee_name)
        .bind(&input.requested_by_and_relationship)
        .bind(&input.other_funding_source_sought)
        .bind(&input.impact)
        .bind(&input.extra_information)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create fund request")
    }

    pub async fn list_for_case(&self, casa_case_id: i64) -> Result<Vec<FundRequest>> {
        sqlx::query_as::<_, FundRequest>(
            "SELECT * FROM fund_requests WHERE casa_case_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(casa_case_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch case fund requests")
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM fund_requests")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count fund requests")
    }

    pub async fn last(&self) -> Result<Option<FundRequest>> {
        sqlx::query_as::<_, FundRequest>("SELECT * FROM fund_requests ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch latest fund request")
    }
}
