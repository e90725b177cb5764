use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::users::models::Role;

/// A freshly minted access token
#[derive(Debug)]
pub struct IssuedToken {
    pub access_token: String,
    /// Seconds until expiry
    pub expires_in: u64,
}

/// Service for issuing and validating HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            token_ttl: config.token_ttl,
        }
    }

    /// Issue an access token for a user
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken> {
        let now = unix_now()?;
        let expires_in = self.token_ttl.as_secs();

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + expires_in,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in,
        })
    }

    /// Validate a token and extract the requester's identity
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        Ok(AuthenticatedUser {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AppError::Internal(format!("System clock is before the epoch: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_issue_then_validate_roundtrip() {
        let tokens = service("a-test-secret-that-is-long-enough!!");
        let user_id = Uuid::new_v4();

        let issued = tokens.issue(user_id, Role::Worker).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let user = tokens.validate(&issued.access_token).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, Role::Worker);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = service("a-test-secret-that-is-long-enough!!");
        let issued = tokens.issue(Uuid::new_v4(), Role::Citizen).unwrap();

        let mut tampered = issued.access_token;
        tampered.pop();
        tampered.push('x');
        assert!(tokens.validate(&tampered).is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = service("a-test-secret-that-is-long-enough!!");
        let verifier = service("another-secret-also-long-enough!!!!");

        let issued = issuer.issue(Uuid::new_v4(), Role::Admin).unwrap();
        assert!(verifier.validate(&issued.access_token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let tokens = service("a-test-secret-that-is-long-enough!!");
        assert!(tokens.validate("not.a.jwt").is_err());
        assert!(tokens.validate("").is_err());
    }
}
