use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use casa_db::models::{casa_case::CasaCase, user::User};

use super::Layout;
use crate::AppState;
use crate::error::PanelResult;
use crate::flash::take_notice;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub role_label: String,
    pub cases: Vec<CasaCase>,
}

/// GET /
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    jar: CookieJar,
) -> PanelResult<Response> {
    let cases = state.case_service.cases_for(&actor).await?;
    let (jar, notice) = take_notice(jar);

    let template = DashboardTemplate {
        layout: Layout::new(&actor, "dashboard", notice),
        role_label: actor.role.label().to_string(),
        cases,
    };
    Ok((jar, template).into_response())
}
