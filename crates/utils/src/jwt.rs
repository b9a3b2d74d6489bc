//! Signed session tokens carried in the session cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in a session token. `role` is the lowercase wire form
/// of the user's role at login time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, role: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            sub: user_id,
            role: role.into(),
            exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_merchant(&self) -> bool {
        self.role == "merchant"
    }
}

pub fn sign(claims: &SessionClaims, secret: &str) -> Result<String, JwtError> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, JwtError> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_claims() {
        let claims = SessionClaims::new(Uuid::new_v4(), "customer", 24);
        let token = sign(&claims, "test-secret").unwrap();
        let decoded = verify(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, "customer");
    }

    #[test]
    fn rejects_wrong_secret() {
        let claims = SessionClaims::new(Uuid::new_v4(), "admin", 24);
        let token = sign(&claims, "secret-a").unwrap();
        assert!(verify(&token, "secret-b").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let claims = SessionClaims::new(Uuid::new_v4(), "customer", -1);
        let token = sign(&claims, "test-secret").unwrap();
        assert!(verify(&token, "test-secret").is_err());
    }
}
