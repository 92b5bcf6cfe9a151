use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::Claims;
use shared_models::error::AppError;

/// Signs an HS256 access token for `email` valid for `ttl_days`.
pub fn issue_token(email: &str, secret: &str, ttl_days: i64) -> Result<String, AppError> {
    if secret.is_empty() {
        return Err(AppError::Internal("Access token secret is not set".to_string()));
    }

    let now = Utc::now();
    let claims = Claims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    if secret.is_empty() {
        return Err("Access token secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| {
            debug!("Token validated successfully for: {}", data.claims.email);
            data.claims
        })
        .map_err(|e| {
            debug!("Token validation failed: {}", e);
            e.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::JwtTestUtils;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_round_trips_email_and_five_day_expiry() {
        let token = issue_token("patient@example.com", SECRET, 5).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.email, "patient@example.com");
        assert_eq!(claims.exp - claims.iat, 5 * 24 * 60 * 60);
    }

    #[test]
    fn rejects_wrong_secret_expired_and_malformed_tokens() {
        let token = issue_token("patient@example.com", SECRET, 5).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());

        let expired = JwtTestUtils::create_expired_token("patient@example.com", SECRET);
        assert!(validate_token(&expired, SECRET).is_err());

        assert!(validate_token(&JwtTestUtils::create_malformed_token(), SECRET).is_err());
    }

    #[test]
    fn empty_secret_never_validates_or_signs() {
        assert!(issue_token("patient@example.com", "", 5).is_err());
        assert!(validate_token("a.b.c", "").is_err());
    }
}
