use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use casa_db::models::user::User;
use serde::Deserialize;

use super::Layout;
use crate::AppState;
use crate::error::{PanelError, PanelResult};
use crate::flash::{set_notice, take_notice};
use crate::services::authorization::{authorize_admin_management, require_casa_admin};

#[derive(Template, WebTemplate)]
#[template(path = "casa_admins.html")]
pub struct AdminsTemplate {
    pub layout: Layout,
    pub admins: Vec<User>,
}

#[derive(Template, WebTemplate)]
#[template(path = "casa_admin_edit.html")]
pub struct EditAdminTemplate {
    pub layout: Layout,
    pub admin_id: i64,
    pub email: String,
    pub display_name: String,
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

async fn load_target(state: &AppState, actor: &User, id: i64) -> PanelResult<User> {
    let target = state
        .user_service
        .get_by_id(id)
        .await?
        .ok_or(PanelError::NotFound)?;
    authorize_admin_management(actor, &target)?;
    Ok(target)
}

/// GET /casa_admins
pub async fn list_admins(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    jar: CookieJar,
) -> PanelResult<Response> {
    require_casa_admin(&actor)?;
    let admins = state.user_service.list_admins(actor.casa_org_id).await?;
    let (jar, notice) = take_notice(jar);

    let template = AdminsTemplate {
        layout: Layout::new(&actor, "admins", notice),
        admins,
    };
    Ok((jar, template).into_response())
}

/// GET /casa_admins/{id}/edit
pub async fn edit_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> PanelResult<Response> {
    let target = load_target(&state, &actor, id).await?;
    let (jar, notice) = take_notice(jar);

    let template = EditAdminTemplate {
        layout: Layout::new(&actor, "admins", notice),
        admin_id: target.id,
        email: target.email,
        display_name: target.display_name,
        errors: Vec::new(),
    };
    Ok((jar, template).into_response())
}

/// POST|PATCH /casa_admins/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<AdminForm>,
) -> PanelResult<Response> {
    let target = load_target(&state, &actor, id).await?;

    match state
        .user_service
        .update_profile(&actor, &target, &form.email, &form.display_name)
        .await
    {
        Ok(updated) => {
            let jar = set_notice(jar, "Admin was successfully updated.");
            let location = format!("/casa_admins/{}/edit", updated.id);
            Ok((jar, Redirect::to(&location)).into_response())
        }
        Err(PanelError::Invalid(errors)) => {
            let template = EditAdminTemplate {
                layout: Layout::new(&actor, "admins", String::new()),
                admin_id: target.id,
                email: form.email,
                display_name: form.display_name,
                errors: errors.full_messages(),
            };
            Ok(template.into_response())
        }
        Err(e) => Err(e),
    }
}
