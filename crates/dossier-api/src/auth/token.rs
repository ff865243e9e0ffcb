use axum::http::{header, HeaderMap};
use dossier_core::AppError;
use dossier_services::AdminSession;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::SESSION_COOKIE;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // admin uid
    pub sid: String, // session id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 encoder and decoder for session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionTokens {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, session: &AdminSession) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: session.uid.clone(),
            sid: session.id.clone(),
            email: session.email.clone(),
            exp: session.expires_at.timestamp(),
            iat: session.issued_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Session has expired".to_string())
                }
                _ => AppError::Unauthorized("Invalid session token".to_string()),
            })
    }
}

/// Session token from the bearer header, falling back to the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value carrying `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session cookie.
pub fn cleared_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    fn session(expires_in: Duration) -> AdminSession {
        let now = Utc::now();
        AdminSession {
            id: "sid-1".to_string(),
            uid: "uid-1".to_string(),
            email: "admin@example.com".to_string(),
            issued_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let tokens = SessionTokens::new(SECRET);
        let token = tokens.issue(&session(Duration::hours(1))).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sid, "sid-1");
        assert_eq!(claims.sub, "uid-1");
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = SessionTokens::new(SECRET)
            .issue(&session(Duration::hours(1)))
            .unwrap();
        let err = SessionTokens::new("another-secret-key-with-32-characters")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = SessionTokens::new(SECRET);
        let token = tokens.issue(&session(Duration::hours(-1))).unwrap();
        let err = tokens.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_token_read_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; dossier_session=abc.def"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));

        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let cookie = session_cookie("t", 60, true);
        assert!(cookie.starts_with("dossier_session=t;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("Secure"));
        assert!(cleared_session_cookie().contains("Max-Age=0"));
    }
}
