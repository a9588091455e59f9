use anyhow::Result;
use casa_db::models::casa_case::CasaCase;
use casa_db::models::fund_request::{FundRequest, NewFundRequest};
use casa_db::models::user::User;
use casa_db::repositories::fund_request_repo::FundRequestRepository;
use garde::Validate;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{PanelError, PanelResult};
use crate::mailer::FundRequestMailer;
use crate::services::activity_service::ActivityService;
use crate::services::authorization::authorize_case;
use crate::validation::{BASE, Errors};

/// Trimmed copies of the fields a request cannot go without. Stored values stay as submitted.
#[derive(Validate)]
struct RequiredFields {
    #[garde(length(min = 1), email)]
    submitter_email: String,
    #[garde(length(min = 1))]
    youth_name: String,
    #[garde(length(min = 1))]
    payment_amount: String,
}

impl RequiredFields {
    fn of(input: &NewFundRequest) -> Self {
        let trimmed = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
        Self {
            submitter_email: trimmed(&input.submitter_email),
            youth_name: trimmed(&input.youth_name),
            payment_amount: trimmed(&input.payment_amount),
        }
    }
}

pub struct FundRequestService {
    pool: SqlitePool,
    fund_requests: FundRequestRepository,
    mailer: Arc<FundRequestMailer>,
}

impl FundRequestService {
    pub fn new(pool: SqlitePool, mailer: Arc<FundRequestMailer>) -> Self {
        Self {
            fund_requests: FundRequestRepository::new(pool.clone()),
            pool,
            mailer,
        }
    }

    /// Starting values for the new-request form.
    pub fn prefill(actor: &User) -> NewFundRequest {
        NewFundRequest {
            submitter_email: Some(actor.email.clone()),
            ..Default::default()
        }
    }

    pub fn validate(input: &NewFundRequest) -> Errors {
        let required = RequiredFields::of(input);
        Errors::validate(
            &required,
            &[
                ("submitter_email", required.submitter_email.as_str()),
                ("youth_name", required.youth_name.as_str()),
                ("payment_amount", required.payment_amount.as_str()),
            ],
        )
    }

    /// Persists the request, then notifies. Nothing is sent unless the save succeeded.
    pub async fn submit(
        &self,
        actor: &User,
        casa_case: &CasaCase,
        input: &NewFundRequest,
    ) -> PanelResult<FundRequest> {
        authorize_case(actor, casa_case)?;

        let mut errors = Self::validate(input);
        if !errors.is_empty() {
            return Err(PanelError::Invalid(errors));
        }

        let fund_request = match self.fund_requests.create(casa_case.id, actor.id, input).await {
            Ok(fr) => fr,
            Err(e) => {
                error!("Failed to save fund request for case {}: {:#}", casa_case.id, e);
                errors.add(BASE, "Fund request could not be saved. Please try again.");
                return Err(PanelError::Invalid(errors));
            }
        };

        info!(
            "Fund request {} created for case {} by user {}",
            fund_request.id, casa_case.id, actor.id
        );
        if let Err(e) = ActivityService::log(
            &self.pool,
            Some(actor.id),
            "FundRequest",
            &format!("Fund request {} for case {}", fund_request.id, casa_case.case_number),
        )
        .await
        {
            warn!("Activity log write failed for fund request {}: {:#}", fund_request.id, e);
        }

        if let Err(e) = self.mailer.send_request(None, &fund_request).deliver().await {
            warn!("Fund request {} saved but mail delivery failed: {:#}", fund_request.id, e);
        }

        Ok(fund_request)
    }

    pub async fn list_for_case(&self, casa_case_id: i64) -> Result<Vec<FundRequest>> {
        self.fund_requests.list_for_case(casa_case_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MockMailTransport;
    use casa_db::memory_pool;
    use casa_db::models::user::{NewUser, Role};
    use casa_db::repositories::{
        case_repo::CaseRepository, org_repo::OrganizationRepository, user_repo::UserRepository,
    };

    struct Fixture {
        pool: SqlitePool,
        volunteer: User,
        own_case: CasaCase,
        foreign_case: CasaCase,
    }

    async fn fixture() -> Fixture {
        let pool = memory_pool().await.unwrap();
        let orgs = OrganizationRepository::new(pool.clone());
        let home = orgs.create("Home", None).await.unwrap();
        let away = orgs.create("Away", None).await.unwrap();
        let volunteer = UserRepository::new(pool.clone())
            .create(&NewUser {
                casa_org_id: home.id,
                role: Role::Volunteer,
                email: "volunteer@casa.org".to_string(),
                display_name: "Vol".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        let cases = CaseRepository::new(pool.clone());
        let own_case = cases.create(home.id, "CINA-123").await.unwrap();
        let foreign_case = cases.create(away.id, "CINA-999").await.unwrap();
        Fixture { pool, volunteer, own_case, foreign_case }
    }

    fn service(pool: &SqlitePool, transport: MockMailTransport) -> FundRequestService {
        let mailer = FundRequestMailer::new("no-reply@casa.local", "funds@casa.local", Arc::new(transport));
        FundRequestService::new(pool.clone(), Arc::new(mailer))
    }

    fn complete_input() -> NewFundRequest {
        NewFundRequest {
            submitter_email: Some("foo@example.com".to_string()),
            youth_name: Some("CINA-123".to_string()),
            payment_amount: Some("$10.00".to_string()),
            deadline: Some("2022-12-31".to_string()),
            request_purpose: Some("something noble".to_string()),
            payee_name: Some("Minnie Mouse".to_string()),
            requested_by_and_relationship: Some("Favorite Volunteer".to_string()),
            other_funding_source_sought: Some("Some other agency".to_string()),
            impact: Some("Great".to_string()),
            extra_information: Some("foo bar".to_string()),
        }
    }

    async fn count(pool: &SqlitePool) -> i64 {
        FundRequestRepository::new(pool.clone()).count().await.unwrap()
    }

    #[tokio::test]
    async fn submit_saves_then_mails_once() {
        let f = fixture().await;
        let mut transport = MockMailTransport::new();
        transport
            .expect_deliver()
            .withf(|mail| mail.subject == "Fund request from foo@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let created = service(&f.pool, transport)
            .submit(&f.volunteer, &f.own_case, &complete_input())
            .await
            .unwrap();

        assert_eq!(count(&f.pool).await, 1);
        assert_eq!(created.casa_case_id, f.own_case.id);
        assert_eq!(created.payee_name.as_deref(), Some("Minnie Mouse"));

        let log = ActivityService::get_latest(&f.pool, 1).await.unwrap();
        assert_eq!(log[0].action, "FundRequest");
        assert_eq!(log[0].user_id, Some(f.volunteer.id));
    }

    #[tokio::test]
    async fn foreign_case_is_forbidden_without_side_effects() {
        let f = fixture().await;
        let mut transport = MockMailTransport::new();
        transport.expect_deliver().times(0);

        let result = service(&f.pool, transport)
            .submit(&f.volunteer, &f.foreign_case, &complete_input())
            .await;

        assert!(matches!(result, Err(PanelError::Forbidden)));
        assert_eq!(count(&f.pool).await, 0);
    }

    #[tokio::test]
    async fn invalid_input_is_not_saved_or_mailed() {
        let f = fixture().await;
        let mut transport = MockMailTransport::new();
        transport.expect_deliver().times(0);

        let input = NewFundRequest {
            submitter_email: Some("not-an-email".to_string()),
            youth_name: Some(" ".to_string()),
            ..Default::default()
        };
        let Err(PanelError::Invalid(errors)) =
            service(&f.pool, transport).submit(&f.volunteer, &f.own_case, &input).await
        else {
            panic!("expected validation failure");
        };

        assert_eq!(
            errors.full_messages(),
            vec![
                "Submitter email is invalid",
                "Youth name can't be blank",
                "Payment amount can't be blank",
            ]
        );
        assert_eq!(count(&f.pool).await, 0);
    }

    #[tokio::test]
    async fn failed_save_skips_the_mailer() {
        let f = fixture().await;
        sqlx::query(
            "CREATE TRIGGER reject_fund_requests BEFORE INSERT ON fund_requests
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .execute(&f.pool)
        .await
        .unwrap();

        let mut transport = MockMailTransport::new();
        transport.expect_deliver().times(0);

        let Err(PanelError::Invalid(errors)) = service(&f.pool, transport)
            .submit(&f.volunteer, &f.own_case, &complete_input())
            .await
        else {
            panic!("expected save failure");
        };

        assert_eq!(errors.on(BASE).len(), 1);
        assert_eq!(count(&f.pool).await, 0);
    }

    #[tokio::test]
    async fn mail_failure_keeps_the_record() {
        let f = fixture().await;
        let mut transport = MockMailTransport::new();
        transport
            .expect_deliver()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("smtp down")));

        let result = service(&f.pool, transport)
            .submit(&f.volunteer, &f.own_case, &complete_input())
            .await;

        assert!(result.is_ok());
        assert_eq!(count(&f.pool).await, 1);
    }

    #[tokio::test]
    async fn activity_log_failure_does_not_block_the_mail() {
        let f = fixture().await;
        sqlx::query(
            "CREATE TRIGGER reject_activity BEFORE INSERT ON activity_log
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .execute(&f.pool)
        .await
        .unwrap();

        let mut transport = MockMailTransport::new();
        transport.expect_deliver().times(1).returning(|_| Ok(()));

        let result = service(&f.pool, transport)
            .submit(&f.volunteer, &f.own_case, &complete_input())
            .await;

        assert!(result.is_ok());
        assert_eq!(count(&f.pool).await, 1);
        assert!(ActivityService::get_latest(&f.pool, 5).await.unwrap().is_empty());
    }

    #[test]
    fn prefill_uses_actor_email() {
        let actor = User {
            id: 1,
            casa_org_id: 1,
            role: Role::Volunteer,
            email: "me@casa.org".to_string(),
            display_name: "Me".to_string(),
            password_hash: String::new(),
            active: true,
            created_at: Default::default(),
            updated_at: Default::default(),
        };
        let prefill = FundRequestService::prefill(&actor);
        assert_eq!(prefill.submitter_email.as_deref(), Some("me@casa.org"));
        assert_eq!(prefill.youth_name, None);
    }
}
