use anyhow::{Result, anyhow};
use casa_db::models::user::Role;
use casa_db::repositories::org_repo::OrganizationRepository;
use sqlx::SqlitePool;

use crate::config::PanelConfig;
use crate::services::{case_service::CaseService, user_service::UserService};

pub async fn create_org(pool: &SqlitePool, name: &str) -> Result<i64> {
    let org = OrganizationRepository::new(pool.clone())
        .create(name.trim(), None)
        .await?;
    println!("Organization '{}' created with id {}.", org.name, org.id);
    Ok(org.id)
}

pub async fn create_user(
    pool: &SqlitePool,
    casa_org_id: i64,
    role: &str,
    email: &str,
    display_name: &str,
    password: &str,
) -> Result<i64> {
    let role: Role = role.parse()?;
    let user = UserService::new(pool.clone())
        .create_user(casa_org_id, role, email, display_name, password)
        .await?;
    println!("{} '{}' created with id {}.", user.role.label(), user.email, user.id);
    Ok(user.id)
}

pub async fn reset_password(pool: &SqlitePool, email: &str, new_pass: &str) -> Result<()> {
    let updated = UserService::new(pool.clone())
        .reset_password(email, new_pass)
        .await?;
    if !updated {
        return Err(anyhow!("No user with email '{}'", email));
    }
    println!("Password for '{}' has been successfully reset.", email.trim());
    Ok(())
}

pub async fn create_case(
    pool: &SqlitePool,
    casa_org_id: i64,
    case_number: &str,
    volunteer_id: Option<i64>,
) -> Result<i64> {
    let cases = CaseService::new(pool.clone());
    let casa_case = cases.create(casa_org_id, case_number).await?;
    println!("Case '{}' created with id {}.", casa_case.case_number, casa_case.id);

    if let Some(volunteer_id) = volunteer_id {
        cases.assign_volunteer(casa_case.id, volunteer_id).await?;
        println!("Assigned volunteer {} to case {}.", volunteer_id, casa_case.id);
    }
    Ok(casa_case.id)
}

pub async fn print_info(pool: &SqlitePool, config: &PanelConfig) -> Result<()> {
    let orgs = OrganizationRepository::new(pool.clone()).get_all().await?;

    println!("\n=== CASA PANEL INFO ===");
    println!("Database:      {}", config.database_url);
    println!("Sign-in URL:   http://<YOUR_HOST>:{}/users/sign_in", config.port);
    println!("Fund requests: {}", config.fund_request_recipient);
    println!("Mail from:     {}", config.mail_from);
    println!("Mail via:      {:?}", config.mail_transport);
    println!("Organizations:");
    for org in orgs {
        println!("  [{}] {}", org.id, org.name);
    }
    println!("=======================\n");
    Ok(())
}
