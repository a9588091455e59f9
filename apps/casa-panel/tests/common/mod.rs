#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use casa_db::memory_pool;
use casa_db::models::{
    casa_case::CasaCase,
    orgs::CasaOrg,
    user::{NewUser, Role, User},
};
use casa_db::repositories::{
    case_repo::CaseRepository, org_repo::OrganizationRepository, user_repo::UserRepository,
};
use casa_panel::config::PanelConfig;
use casa_panel::mailer::MemoryTransport;
use casa_panel::{AppState, build_router};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
    pub outbox: MemoryTransport,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = memory_pool().await.unwrap();
        let config = PanelConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "FUND_REQUEST_RECIPIENT" => Some("funds@casa.local".to_string()),
            _ => None,
        })
        .unwrap();
        let outbox = MemoryTransport::new();
        let state = AppState::new(pool.clone(), config, Arc::new(outbox.clone()));

        Self {
            router: build_router(state.clone()),
            pool,
            state,
            outbox,
        }
    }

    pub async fn org(&self, name: &str) -> CasaOrg {
        OrganizationRepository::new(self.pool.clone())
            .create(name, None)
            .await
            .unwrap()
    }

    pub async fn user(&self, org: &CasaOrg, role: Role, email: &str) -> User {
        self.user_with_hash(org, role, email, "not-a-real-hash").await
    }

    pub async fn user_with_hash(&self, org: &CasaOrg, role: Role, email: &str, hash: &str) -> User {
        UserRepository::new(self.pool.clone())
            .create(&NewUser {
                casa_org_id: org.id,
                role,
                email: email.to_string(),
                display_name: format!("{} user", role.label()),
                password_hash: hash.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn casa_case(&self, org: &CasaOrg, case_number: &str) -> CasaCase {
        CaseRepository::new(self.pool.clone())
            .create(org.id, case_number)
            .await
            .unwrap()
    }

    /// Session cookie for `user`, skipping the password check.
    pub async fn sign_in(&self, user: &User) -> String {
        let token = self.state.session_service.start(user.id).await.unwrap();
        format!("casa_session={}", token)
    }

    pub async fn get(&self, path: &str, cookie: &str) -> Response<Body> {
        let mut request = Request::builder().method(Method::GET).uri(path);
        if !cookie.is_empty() {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn send_form(
        &self,
        method: Method,
        path: &str,
        cookie: &str,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let mut request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if !cookie.is_empty() {
            request = request.header(header::COOKIE, cookie);
        }
        let body = serde_urlencoded::to_string(fields).unwrap();
        self.router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, path: &str, cookie: &str, fields: &[(&str, &str)]) -> Response<Body> {
        self.send_form(Method::POST, path, cookie, fields).await
    }
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// `name=value` of a cookie the response sets, ready to send back.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
