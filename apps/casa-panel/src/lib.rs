pub mod cli;
pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod mailer;
pub mod services;
pub mod validation;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::config::PanelConfig;
use crate::handlers::auth::{SESSION_COOKIE, SIGN_IN_PATH};
use crate::mailer::{FundRequestMailer, MailTransport};
use crate::services::{
    case_service::CaseService, fund_request_service::FundRequestService,
    session_service::SessionService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<PanelConfig>,
    pub user_service: Arc<UserService>,
    pub case_service: Arc<CaseService>,
    pub fund_request_service: Arc<FundRequestService>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: PanelConfig, transport: Arc<dyn MailTransport>) -> Self {
        let mailer = Arc::new(FundRequestMailer::new(
            config.mail_from.clone(),
            config.fund_request_recipient.clone(),
            transport,
        ));

        Self {
            user_service: Arc::new(UserService::new(pool.clone())),
            case_service: Arc::new(CaseService::new(pool.clone())),
            fund_request_service: Arc::new(FundRequestService::new(pool.clone(), mailer)),
            session_service: Arc::new(SessionService::new(pool.clone(), config.session_ttl_hours)),
            config: Arc::new(config),
            pool,
        }
    }
}

/// Resolves the session cookie to a `User` request extension, or sends the visitor to sign in.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.session_service.resolve(cookie.value()).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
                return next.run(req).await;
            }
            Ok(None) => {
                tracing::debug!("Session cookie present but no live session");
            }
            Err(e) => {
                tracing::error!("Session lookup failed: {:#}", e);
            }
        }
    }

    Redirect::to(SIGN_IN_PATH).into_response()
}

pub fn build_router(state: AppState) -> Router {
    let app_routes = Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/casa_cases/{id}", get(handlers::casa_cases::show_case))
        .route(
            "/casa_cases/{id}/fund_request/new",
            get(handlers::fund_requests::new_fund_request),
        )
        .route(
            "/casa_cases/{id}/fund_request",
            post(handlers::fund_requests::create_fund_request),
        )
        .route("/casa_admins", get(handlers::casa_admins::list_admins))
        .route("/casa_admins/{id}/edit", get(handlers::casa_admins::edit_admin))
        .route(
            "/casa_admins/{id}",
            post(handlers::casa_admins::update_admin).patch(handlers::casa_admins::update_admin),
        )
        .route("/users/sign_out", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route(
            SIGN_IN_PATH,
            get(handlers::auth::get_login).post(handlers::auth::login),
        )
        .route("/health", get(handlers::health::health_check))
        .merge(app_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}
