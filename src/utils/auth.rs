use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Admin sessions expire after 24 hours, matching the cookie lifetime.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}

/// Mint the signed session token placed in the `auth_token` cookie.
pub fn create_session_token(username: &str, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(SESSION_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        exp: expiration as usize,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(token)
}

/// Check a presented session token. Expired or tampered tokens fail.
pub fn validate_session_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_cycle() {
        let secret = "test_secret";
        let token = create_session_token("admin", secret).unwrap();
        let claims = validate_session_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_session_token("admin", "secret_a").unwrap();
        assert!(validate_session_token(&token, "secret_b").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_session_token("not-a-token", "secret").is_err());
    }
}
