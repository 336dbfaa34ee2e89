pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Token payload. `username` and `isAdmin` form the request identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            username: username.into(),
            is_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Sign a token for the given user
pub fn create_token(username: &str, is_admin: bool) -> Result<String, JwtError> {
    generate_jwt(Claims::new(username, is_admin))
}

pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key)
        .map_err(JwtError::TokenGeneration)
}

/// Verify signature and expiry, returning the claims
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(JwtError::Verification)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identity() {
        let token = create_token("test", false).unwrap();
        let claims = validate_jwt(&token).unwrap();
        assert_eq!(claims.username, "test");
        assert!(!claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn payload_uses_camel_case_admin_flag() {
        let value = serde_json::to_value(Claims::new("admin", true)).unwrap();
        assert_eq!(value["isAdmin"], true);
        assert_eq!(value["username"], "admin");
        assert!(value.get("iat").is_some());
    }

    #[test]
    fn rejects_foreign_signature() {
        let claims = Claims::new("test", false);
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"wrong")).unwrap();
        assert!(matches!(validate_jwt(&token), Err(JwtError::Verification(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::new("test", false);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = generate_jwt(claims).unwrap();
        match validate_jwt(&token) {
            Err(JwtError::Verification(e)) => {
                assert_eq!(*e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
            }
            other => panic!("expected an expired-token error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(validate_jwt("not.a.token").is_err());
    }
}
