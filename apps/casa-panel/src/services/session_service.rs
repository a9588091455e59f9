use anyhow::Result;
use casa_db::models::user::User;
use casa_db::repositories::{session_repo::SessionRepository, user_repo::UserRepository};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Cookie-backed sign-in: an opaque token in the cookie, the user id in `sessions`.
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: SessionRepository,
    users: UserRepository,
    ttl: Duration,
}

impl SessionService {
    pub fn new(pool: SqlitePool, ttl_hours: i64) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Verifies credentials and opens a session. `None` means the sign-in was refused.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<(String, User)>> {
        let email = email.trim();
        let Some(user) = self.users.get_by_email(email).await? else {
            info!("Sign-in refused for unknown email '{}'", email);
            return Ok(None);
        };

        if !user.active {
            info!("Sign-in refused for inactive user {}", user.id);
            return Ok(None);
        }

        if !bcrypt::verify(password, &user.password_hash).unwrap_or(false) {
            info!("Sign-in refused for user {}: bad password", user.id);
            return Ok(None);
        }

        let token = self.start(user.id).await?;
        info!("Created session for user {} (token: {}...)", user.id, &token[..6]);
        Ok(Some((token, user)))
    }

    /// Opens a session for a user without checking credentials.
    pub async fn start(&self, user_id: i64) -> Result<String> {
        let token = uuid::Uuid::new_v4().to_string();
        let expires_at = Utc::now().naive_utc() + self.ttl;
        self.sessions.create(&token, user_id, expires_at).await?;
        Ok(token)
    }

    /// The active user behind a session token, if the session is still valid.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let Some(session) = self.sessions.get(token).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now().naive_utc()) {
            self.sessions.delete(token).await?;
            return Ok(None);
        }

        match self.users.get_by_id(session.user_id).await? {
            Some(user) if user.active => Ok(Some(user)),
            _ => {
                warn!("Session points at missing or inactive user {}", session.user_id);
                self.sessions.delete(token).await?;
                Ok(None)
            }
        }
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(token).await
    }

    pub async fn purge_expired(&self) -> Result<u64> {
        self.sessions.delete_expired(Utc::now().naive_utc()).await
    }
}
