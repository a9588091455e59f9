use anyhow::{Context, Result};
use casa_db::models::user::{NewUser, Role, User};
use casa_db::repositories::user_repo::UserRepository;
use garde::Validate;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{PanelError, PanelResult};
use crate::services::activity_service::ActivityService;
use crate::validation::Errors;

#[derive(Validate)]
struct ProfileInput {
    #[garde(length(min = 1), email)]
    email: String,
    #[garde(length(min = 1))]
    display_name: String,
}

#[derive(Debug, Clone)]
pub struct UserService {
    pool: SqlitePool,
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        self.users.get_by_id(id).await
    }

    pub async fn list_admins(&self, casa_org_id: i64) -> Result<Vec<User>> {
        self.users.list_by_role(casa_org_id, Role::CasaAdmin).await
    }

    /// Changes an admin's email and display name. Nothing is written unless both pass.
    pub async fn update_profile(
        &self,
        actor: &User,
        target: &User,
        email: &str,
        display_name: &str,
    ) -> PanelResult<User> {
        let email = email.trim();
        let display_name = display_name.trim();

        let input = ProfileInput {
            email: email.to_string(),
            display_name: display_name.to_string(),
        };
        let mut errors = Errors::validate(
            &input,
            &[("email", email), ("display_name", display_name)],
        );
        if errors.on("email").is_empty() && self.users.email_taken(email, target.id).await? {
            errors.add("email", "has already been taken");
        }
        if !errors.is_empty() {
            return Err(PanelError::Invalid(errors));
        }

        let updated = match self.users.update_profile(target.id, email, display_name).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                let mut errors = Errors::new();
                errors.add("email", "has already been taken");
                return Err(PanelError::Invalid(errors));
            }
            Err(e) => return Err(e.into()),
        };

        info!("User {} updated profile of user {}", actor.id, target.id);
        if let Err(e) = ActivityService::log(
            &self.pool,
            Some(actor.id),
            "User",
            &format!("User {} updated: email={}, display_name={}", target.id, email, display_name),
        )
        .await
        {
            warn!("Activity log write failed for user {}: {:#}", target.id, e);
        }

        Ok(updated)
    }

    pub async fn create_user(
        &self,
        casa_org_id: i64,
        role: Role,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<User> {
        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;
        self.users
            .create(&NewUser {
                casa_org_id,
                role,
                email: email.trim().to_string(),
                display_name: display_name.trim().to_string(),
                password_hash,
            })
            .await
    }

    /// Returns false when no user has that email.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<bool> {
        let hash =
            bcrypt::hash(new_password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;
        self.users.set_password_hash(email.trim(), &hash).await
    }
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .filter_map(|db| db.as_database_error())
        .any(|db| db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use casa_db::memory_pool;
    use casa_db::repositories::org_repo::OrganizationRepository;

    async fn setup() -> (UserService, UserRepository, User, User) {
        let pool = memory_pool().await.unwrap();
        let org = OrganizationRepository::new(pool.clone())
            .create("CASA", None)
            .await
            .unwrap();
        let repo = UserRepository::new(pool.clone());
        let mk = |email: &str| NewUser {
            casa_org_id: org.id,
            role: Role::CasaAdmin,
            email: email.to_string(),
            display_name: "Admin".to_string(),
            password_hash: "x".to_string(),
        };
        let admin = repo.create(&mk("admin@casa.org")).await.unwrap();
        let other = repo.create(&mk("other@casa.org")).await.unwrap();
        (UserService::new(pool), repo, admin, other)
    }

    #[tokio::test]
    async fn valid_update_persists_trimmed_values() {
        let (service, repo, admin, _) = setup().await;

        service
            .update_profile(&admin, &admin, " root@casa.com ", "Root Admin")
            .await
            .unwrap();

        let reloaded = repo.get_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(reloaded.email, "root@casa.com");
        assert_eq!(reloaded.display_name, "Root Admin");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_and_nothing_changes() {
        let (service, repo, admin, _) = setup().await;

        let err = service.update_profile(&admin, &admin, "", "  ").await.unwrap_err();
        let PanelError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(
            errors.full_messages(),
            vec!["Email can't be blank", "Display name can't be blank"]
        );

        let reloaded = repo.get_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(reloaded.email, "admin@casa.org");
        assert_eq!(reloaded.display_name, "Admin");
    }

    #[tokio::test]
    async fn malformed_and_duplicate_emails_are_rejected() {
        let (service, _, admin, _) = setup().await;

        let Err(PanelError::Invalid(errors)) =
            service.update_profile(&admin, &admin, "root", "Root").await
        else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.full_messages(), vec!["Email is invalid"]);

        let Err(PanelError::Invalid(errors)) =
            service.update_profile(&admin, &admin, "OTHER@casa.org", "Root").await
        else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.full_messages(), vec!["Email has already been taken"]);
    }

    #[tokio::test]
    async fn update_writes_activity_log() {
        let (service, _, admin, other) = setup().await;

        service
            .update_profile(&admin, &other, "renamed@casa.org", "Renamed")
            .await
            .unwrap();

        let log = ActivityService::get_latest(&service.pool, 5).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].user_id, Some(admin.id));
        assert_eq!(log[0].action, "User");
    }

    #[tokio::test]
    async fn activity_log_failure_still_saves_the_profile() {
        let (service, repo, admin, _) = setup().await;
        sqlx::query(
            "CREATE TRIGGER reject_activity BEFORE INSERT ON activity_log
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .execute(&service.pool)
        .await
        .unwrap();

        service
            .update_profile(&admin, &admin, "root@casa.com", "Root")
            .await
            .unwrap();

        let reloaded = repo.get_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(reloaded.email, "root@casa.com");
        assert!(ActivityService::get_latest(&service.pool, 5).await.unwrap().is_empty());
    }
}
