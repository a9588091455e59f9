use anyhow::Result;
use casa_db::models::{casa_case::CasaCase, user::User};
use casa_db::repositories::case_repo::CaseRepository;
use sqlx::SqlitePool;

use crate::error::{PanelError, PanelResult};
use crate::services::authorization::authorize_case;

#[derive(Debug, Clone)]
pub struct CaseService {
    cases: CaseRepository,
}

impl CaseService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            cases: CaseRepository::new(pool),
        }
    }

    /// Loads a case the actor is allowed to act on.
    pub async fn find_for(&self, actor: &User, casa_case_id: i64) -> PanelResult<CasaCase> {
        let casa_case = self
            .cases
            .get_by_id(casa_case_id)
            .await?
            .ok_or(PanelError::NotFound)?;
        authorize_case(actor, &casa_case)?;
        Ok(casa_case)
    }

    /// Dashboard listing: volunteers see their assignments, everyone else the whole org.
    pub async fn cases_for(&self, actor: &User) -> Result<Vec<CasaCase>> {
        if actor.is_volunteer() {
            self.cases.list_for_volunteer(actor.id).await
        } else {
            self.cases.list_for_org(actor.casa_org_id).await
        }
    }

    pub async fn create(&self, casa_org_id: i64, case_number: &str) -> Result<CasaCase> {
        self.cases.create(casa_org_id, case_number.trim()).await
    }

    pub async fn assign_volunteer(&self, casa_case_id: i64, volunteer_id: i64) -> Result<()> {
        self.cases.assign_volunteer(casa_case_id, volunteer_id).await
    }
}
