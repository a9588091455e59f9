use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use casa_db::models::{
    casa_case::CasaCase,
    fund_request::{FUND_REQUEST_FIELDS, NewFundRequest},
    user::User,
};

use super::Layout;
use crate::AppState;
use crate::error::{PanelError, PanelResult};
use crate::flash::set_notice;
use crate::services::fund_request_service::FundRequestService;

/// Free-text fields rendered as a textarea rather than a single line.
const LONG_FIELDS: [&str; 4] = [
    "request_purpose",
    "requested_by_and_relationship",
    "impact",
    "extra_information",
];

pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub long: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "fund_request_new.html")]
pub struct NewFundRequestTemplate {
    pub layout: Layout,
    pub casa_case: CasaCase,
    pub fields: Vec<FormField>,
    pub errors: Vec<String>,
}

impl NewFundRequestTemplate {
    fn build(actor: &User, casa_case: CasaCase, input: &NewFundRequest, errors: Vec<String>) -> Self {
        let fields = FUND_REQUEST_FIELDS
            .iter()
            .zip(input.values())
            .map(|(&(name, label), value)| FormField {
                name,
                label,
                value: value.unwrap_or_default().to_string(),
                long: LONG_FIELDS.contains(&name),
            })
            .collect();

        Self {
            layout: Layout::new(actor, "cases", String::new()),
            casa_case,
            fields,
            errors,
        }
    }
}

/// GET /casa_cases/{casa_id}/fund_request/new
pub async fn new_fund_request(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(casa_id): Path<i64>,
) -> PanelResult<Response> {
    let casa_case = state.case_service.find_for(&actor, casa_id).await?;
    let prefill = FundRequestService::prefill(&actor);
    Ok(NewFundRequestTemplate::build(&actor, casa_case, &prefill, Vec::new()).into_response())
}

/// POST /casa_cases/{casa_id}/fund_request
pub async fn create_fund_request(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(casa_id): Path<i64>,
    jar: CookieJar,
    Form(input): Form<NewFundRequest>,
) -> PanelResult<Response> {
    let casa_case = state.case_service.find_for(&actor, casa_id).await?;

    match state.fund_request_service.submit(&actor, &casa_case, &input).await {
        Ok(_) => {
            let jar = set_notice(
                jar,
                &format!("Fund Request was sent for case {}", casa_case.case_number),
            );
            let location = format!("/casa_cases/{}", casa_case.id);
            Ok((jar, Redirect::to(&location)).into_response())
        }
        Err(PanelError::Invalid(errors)) => {
            let template =
                NewFundRequestTemplate::build(&actor, casa_case, &input, errors.full_messages());
            Ok(template.into_response())
        }
        Err(e) => Err(e),
    }
}
