pub mod auth;
pub mod casa_admins;
pub mod casa_cases;
pub mod dashboard;
pub mod fund_requests;
pub mod health;

use casa_db::models::user::User;

/// Values the page layout needs on every signed-in page.
pub struct Layout {
    pub username: String,
    pub is_admin: bool,
    pub active_page: String,
    pub notice: String,
}

impl Layout {
    pub fn new(actor: &User, active_page: &str, notice: String) -> Self {
        Self {
            username: actor.display_name.clone(),
            is_admin: actor.is_casa_admin(),
            active_page: active_page.to_string(),
            notice,
        }
    }
}
