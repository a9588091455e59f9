use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use casa_db::models::{casa_case::CasaCase, fund_request::FundRequest, user::User};

use super::Layout;
use crate::AppState;
use crate::error::PanelResult;
use crate::flash::take_notice;

#[derive(Template, WebTemplate)]
#[template(path = "casa_case.html")]
pub struct CaseTemplate {
    pub layout: Layout,
    pub casa_case: CasaCase,
    pub fund_requests: Vec<FundRequest>,
}

/// GET /casa_cases/{id}
pub async fn show_case(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> PanelResult<Response> {
    let casa_case = state.case_service.find_for(&actor, id).await?;
    let fund_requests = state.fund_request_service.list_for_case(casa_case.id).await?;
    let (jar, notice) = take_notice(jar);

    let template = CaseTemplate {
        layout: Layout::new(&actor, "cases", notice),
        casa_case,
        fund_requests,
    };
    Ok((jar, template).into_response())
}
