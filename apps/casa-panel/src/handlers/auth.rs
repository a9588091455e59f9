use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use tracing::info;

use crate::AppState;
use crate::error::PanelResult;
use crate::flash::take_notice;

pub const SESSION_COOKIE: &str = "casa_session";
pub const SIGN_IN_PATH: &str = "/users/sign_in";

#[derive(Template, WebTemplate)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {
    pub email: String,
    pub error: String,
    pub notice: String,
}

#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /users/sign_in
pub async fn get_login(jar: CookieJar) -> impl IntoResponse {
    let (jar, notice) = take_notice(jar);
    (
        jar,
        SignInTemplate {
            email: String::new(),
            error: String::new(),
            notice,
        },
    )
}

/// POST /users/sign_in
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> PanelResult<Response> {
    let Some((token, user)) = state.session_service.login(&form.email, &form.password).await? else {
        return Ok(SignInTemplate {
            email: form.email,
            error: "Invalid Email or password.".to_string(),
            notice: String::new(),
        }
        .into_response());
    };

    info!("User {} signed in", user.id);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(state.config.session_ttl_hours))
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// POST /users/sign_out
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> PanelResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.session_service.logout(cookie.value()).await?;
    }

    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_value("");
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(0));

    Ok((jar.add(cookie), Redirect::to(SIGN_IN_PATH)).into_response())
}
