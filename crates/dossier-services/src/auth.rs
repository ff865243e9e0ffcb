//! Admin sign-in and server-side sessions.
//!
//! A single shared admin credential is checked by [`CredentialAuthProvider`].
//! Each successful sign-in opens an [`AdminSession`] in the
//! [`SessionRegistry`]; the HTTP layer only carries the session id.

use std::collections::HashMap;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dossier_core::{AppError, Config};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminIdentity {
    /// Stable owner id used to scope every collection.
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, AppError>;

    async fn sign_out(&self, _identity: &AdminIdentity) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct CredentialAuthProvider {
    email: String,
    password_hash: String,
}

impl CredentialAuthProvider {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin_email(), config.admin_password_hash())
    }

    pub fn uid_for(email: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes()).to_string()
    }
}

#[async_trait]
impl AuthProvider for CredentialAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, AppError> {
        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::AuthProvider(format!("Invalid admin password hash: {}", e)))?;

        let email_matches = email.trim().eq_ignore_ascii_case(self.email.trim());
        let password_matches = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if !email_matches || !password_matches {
            tracing::warn!(email = %email.trim(), "Admin sign-in rejected");
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        Ok(AdminIdentity {
            uid: Self::uid_for(&self.email),
            email: self.email.trim().to_string(),
        })
    }
}

/// Produce an argon2 PHC string for `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminSession {
    pub id: String,
    pub uid: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

/// Live admin sessions, created once at startup and shared through app state.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, AdminSession>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, identity: &AdminIdentity) -> AdminSession {
        let issued_at = Utc::now();
        let session = AdminSession {
            id: Uuid::new_v4().to_string(),
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            issued_at,
            expires_at: issued_at + self.ttl,
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(issued_at));
        sessions.insert(session.id.clone(), session.clone());
        tracing::info!(session_id = %session.id, "Admin session opened");
        session
    }

    /// Look up a live session. Expired sessions are dropped on access.
    pub async fn get(&self, id: &str) -> Option<AdminSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(id);
        None
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Admin session closed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CredentialAuthProvider {
        CredentialAuthProvider::new("admin@example.com", hash_password("s3cret-pass").unwrap())
    }

    #[tokio::test]
    async fn test_sign_in_with_valid_credentials() {
        let identity = provider()
            .sign_in(" Admin@Example.com ", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(identity.email, "admin@example.com");
        assert_eq!(identity.uid, CredentialAuthProvider::uid_for("admin@example.com"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let err = provider()
            .sign_in("admin@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_provider_error() {
        let provider = CredentialAuthProvider::new("admin@example.com", "plaintext");
        let err = provider.sign_in("admin@example.com", "x").await.unwrap_err();
        assert!(matches!(err, AppError::AuthProvider(_)));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let identity = AdminIdentity {
            uid: "u1".into(),
            email: "admin@example.com".into(),
        };
        let session = registry.create(&identity).await;
        assert_eq!(registry.get(&session.id).await, Some(session.clone()));
        assert!(registry.remove(&session.id).await);
        assert_eq!(registry.get(&session.id).await, None);
    }

    #[tokio::test]
    async fn test_expired_session_not_returned() {
        let registry = SessionRegistry::new(Duration::zero());
        let identity = AdminIdentity {
            uid: "u1".into(),
            email: "admin@example.com".into(),
        };
        let session = registry.create(&identity).await;
        assert_eq!(registry.get(&session.id).await, None);
    }
}
