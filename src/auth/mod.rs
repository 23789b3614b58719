use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod password;

pub use password::{hash_password, verify_password};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: String, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.session_hours())).timestamp();

        Self {
            user_id,
            username,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a session token and extract its claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str, security: &SecurityConfig) -> String {
    let max_age = security.session_hours() * 3600;
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value expiring the session
pub fn clear_session_cookie(security: &SecurityConfig) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Random per-user salt
pub(crate) fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn sha256_hex(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MAX_JWT_EXPIRY_HOURS};

    #[test]
    fn round_trips_claims() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(7, "alice".into(), &security), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn huge_expiry_is_capped_instead_of_overflowing() {
        let mut security = AppConfig::development().security;
        security.jwt_expiry_hours = u64::MAX / 2;

        let claims = Claims::new(7, "alice".into(), &security);
        assert_eq!(claims.exp - claims.iat, MAX_JWT_EXPIRY_HOURS as i64 * 3600);

        let cookie = session_cookie("abc", &security);
        assert!(cookie.contains(&format!("Max-Age={}", MAX_JWT_EXPIRY_HOURS * 3600)));

        let token = generate_jwt(&claims, &security).unwrap();
        assert_eq!(validate_jwt(&token, &security).unwrap().user_id, 7);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(7, "alice".into(), &security), &security).unwrap();

        let mut other = security.clone();
        other.jwt_secret = "someone-else".into();
        assert!(matches!(validate_jwt(&token, &other), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn refuses_to_sign_without_a_secret() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        let claims = Claims::new(1, "bob".into(), &security);
        assert!(matches!(generate_jwt(&claims, &security), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn secure_cookies_carry_the_flag() {
        let mut security = AppConfig::development().security;
        assert!(!session_cookie("t", &security).contains("Secure"));
        security.secure_cookies = true;
        assert!(session_cookie("t", &security).ends_with("; Secure"));
        assert!(clear_session_cookie(&security).contains("Max-Age=0"));
    }
}
