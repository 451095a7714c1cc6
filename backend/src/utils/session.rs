use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::Config;
use crate::constants::{SESSION_COOKIE_NAME, SESSION_ISSUER};
use crate::error::ApiError;

/// Claims carried by a session token. Tokens are issued by the external auth
/// layer (or the `mint_session` dev binary); this side only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours as i64);

        Self {
            sub: user_id.to_string(),
            email,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: SESSION_ISSUER.to_string(),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.sub.parse().ok()
    }
}

pub fn issue_token(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(secret: &str, token: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.set_issuer(&[SESSION_ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Pulls the session token out of the `Cookie` header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then(|| value.to_string())
    })
}

/// The authenticated caller, derived from the signed session cookie.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequestParts<(PgPool, Config)> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &(PgPool, Config),
    ) -> Result<Self, Self::Rejection> {
        let (_, config) = state;
        let token = session_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let claims =
            verify_token(&config.session_secret, &token).ok_or(ApiError::Unauthenticated)?;
        let user_id = claims.user_id().ok_or(ApiError::Unauthenticated)?;

        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-long-enough-for-hs256";

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "rita@example.com".to_string(), 1);
        let token = issue_token(SECRET, &claims).unwrap();

        let verified = verify_token(SECRET, &token).unwrap();
        assert_eq!(verified.user_id(), Some(user_id));
        assert_eq!(verified.email, "rita@example.com");
        assert_eq!(verified.iss, SESSION_ISSUER);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "rita@example.com".to_string(), 1);
        let token = issue_token(SECRET, &claims).unwrap();

        assert!(verify_token("a-different-secret-entirely", &token).is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), "rita@example.com".to_string(), 1);
        claims.iat = Utc::now().timestamp() - 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = issue_token(SECRET, &claims).unwrap();

        assert!(verify_token(SECRET, &token).is_none());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token(SECRET, "not-a-token").is_none());
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE_NAME}=abc123; lang=en"))
                .unwrap(),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_session_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
