use anyhow::anyhow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Volunteer,
    Supervisor,
    CasaAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Supervisor => "supervisor",
            Role::CasaAdmin => "casa_admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Volunteer => "Volunteer",
            Role::Supervisor => "Supervisor",
            Role::CasaAdmin => "Admin",
        }
    }
}

// Rows are guarded by a CHECK constraint; anything unexpected gets the least privilege.
impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "casa_admin" => Role::CasaAdmin,
            "supervisor" => Role::Supervisor,
            _ => Role::Volunteer,
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volunteer" => Ok(Role::Volunteer),
            "supervisor" => Ok(Role::Supervisor),
            "casa_admin" | "admin" => Ok(Role::CasaAdmin),
            other => Err(anyhow!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in actor: volunteer, supervisor or admin of one organization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub casa_org_id: i64,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn is_casa_admin(&self) -> bool {
        self.role == Role::CasaAdmin
    }

    pub fn is_volunteer(&self) -> bool {
        self.role == Role::Volunteer
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub casa_org_id: i64,
    pub role: Role,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}
