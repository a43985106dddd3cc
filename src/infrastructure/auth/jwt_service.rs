//! JWT service for token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::auth::{
    errors::AuthError,
    value_objects::{AuthToken, UserId, UserRole},
};

/// JWT service for generating and validating access tokens
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    token_ttl_hours: u64,
}

impl JwtService {
    pub fn new(secret: String, token_ttl_hours: u64) -> Self {
        Self {
            secret,
            token_ttl_hours,
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(
        &self,
        user_id: UserId,
        username: String,
        role: UserRole,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_ttl_hours as i64);

        let claims = AuthToken::new(
            user_id,
            username,
            role,
            exp.timestamp() as usize,
            now.timestamp() as usize,
        );

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT token: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<AuthToken, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        decode::<AuthToken>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(
            "test-secret-key-at-least-32-characters-long".to_string(),
            24,
        )
    }

    #[test]
    fn test_token_generation_and_validation() {
        let service = service();
        let token = service
            .generate_access_token(UserId::new(7), "analyst".to_string(), UserRole::User)
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), UserId::new(7));
        assert_eq!(claims.username, "analyst");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service
            .generate_access_token(UserId::new(7), "analyst".to_string(), UserRole::Admin)
            .unwrap();

        let other = JwtService::new("a-completely-different-secret-value!!".to_string(), 24);
        assert_eq!(
            other.validate_token(&token).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
