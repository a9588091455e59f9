use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Writes outgoing mail to the tracing log.
    Log,
    /// Keeps outgoing mail in process memory.
    Memory,
}

impl FromStr for MailTransportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("Unknown MAIL_TRANSPORT: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_fund_request_recipient")]
    pub fund_request_recipient: String,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default = "default_mail_transport")]
    pub mail_transport: MailTransportKind,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

fn default_port() -> u16 {
    3000
}

fn default_fund_request_recipient() -> String {
    "fund-requests@casa.local".to_string()
}

fn default_mail_from() -> String {
    "no-reply@casa.local".to_string()
}

fn default_mail_transport() -> MailTransportKind {
    MailTransportKind::Log
}

fn default_session_ttl_hours() -> i64 {
    24
}

impl PanelConfig {
    pub fn load() -> Result<Self> {
        let config_paths = ["/etc/casa/panel.toml", "./panel.toml"];

        for path in config_paths {
            if let Ok(contents) = fs::read_to_string(path) {
                tracing::info!("Loading config from {}", path);
                let config: Self =
                    toml::from_str(&contents).with_context(|| format!("Invalid config file {}", path))?;
                config.validate()?;
                return Ok(config);
            }
        }

        tracing::info!("Loading config from environment");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup; `std::env::var` in production.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: match lookup("PANEL_PORT") {
                Some(p) => p.parse().context("PANEL_PORT must be a number")?,
                None => default_port(),
            },
            fund_request_recipient: lookup("FUND_REQUEST_RECIPIENT")
                .unwrap_or_else(default_fund_request_recipient),
            mail_from: lookup("MAIL_FROM").unwrap_or_else(default_mail_from),
            mail_transport: match lookup("MAIL_TRANSPORT") {
                Some(kind) => kind.parse()?,
                None => default_mail_transport(),
            },
            session_ttl_hours: match lookup("SESSION_TTL_HOURS") {
                Some(h) => h.parse().context("SESSION_TTL_HOURS must be a number")?,
                None => default_session_ttl_hours(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow!("DATABASE_URL must start with sqlite:"));
        }
        if self.session_ttl_hours <= 0 {
            return Err(anyhow!("SESSION_TTL_HOURS must be positive"));
        }
        Ok(())
    }
}
