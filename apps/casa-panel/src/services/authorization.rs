//! Organization scoping. Every check reduces to comparing `casa_org_id`s.

use casa_db::models::{casa_case::CasaCase, user::User};

use crate::error::{PanelError, PanelResult};

/// Any role may act on a case of its own organization, and only there.
pub fn authorize_case(actor: &User, casa_case: &CasaCase) -> PanelResult<()> {
    if actor.casa_org_id == casa_case.casa_org_id {
        Ok(())
    } else {
        Err(PanelError::Forbidden)
    }
}

/// Admin records are managed by admins of the same organization.
pub fn authorize_admin_management(actor: &User, target: &User) -> PanelResult<()> {
    if actor.is_casa_admin() && target.is_casa_admin() && actor.casa_org_id == target.casa_org_id {
        Ok(())
    } else {
        Err(PanelError::Forbidden)
    }
}

pub fn require_casa_admin(actor: &User) -> PanelResult<()> {
    if actor.is_casa_admin() {
        Ok(())
    } else {
        Err(PanelError::Forbidden)
    }
}
