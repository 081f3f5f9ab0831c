use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;

/// Claims expected in access tokens issued by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the stable user id
    pub sub: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
    /// Role names granted to the user
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
}

/// Validates HS256-signed access tokens against the shared secret.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate a bearer token and return the identity it carries.
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(AuthenticatedUser {
            sub: token_data.claims.sub,
            name: token_data.claims.name,
            roles: token_data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            jwt_leeway: Duration::from_secs(0),
            issuer: None,
            audience: None,
        }
    }

    fn sign(claims: &Claims, config: &AuthConfig) -> String {
        encode(
            &Header::default(), // HS256
            claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "user-42".to_string(),
                name: Some("Maria Silva".to_string()),
                roles: vec!["official".to_string()],
                exp: now + 600,
                iat: now,
            },
            &config,
        );

        let user = JwtValidator::new(&config).validate_token(&token).unwrap();
        assert_eq!(user.sub, "user-42");
        assert_eq!(user.name.as_deref(), Some("Maria Silva"));
        assert!(user.is_official());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "user-42".to_string(),
                name: None,
                roles: vec![],
                exp: now - 600,
                iat: now - 1200,
            },
            &config,
        );

        let result = JwtValidator::new(&config).validate_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "user-42".to_string(),
                name: None,
                roles: vec![],
                exp: now + 600,
                iat: now,
            },
            &config,
        );

        let other = AuthConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            ..test_config()
        };
        assert!(JwtValidator::new(&other).validate_token(&token).is_err());
    }
}
