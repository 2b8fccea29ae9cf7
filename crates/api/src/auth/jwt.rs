//! HS256 access-token validation.

use clienter_core::types::DbId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from the provider's access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the provider's user id.
    pub sub: DbId,
    /// Audience; must match [`AuthConfig::audience`].
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Configuration for access-token validation.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Expected `aud` claim.
    pub audience: String,
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var             | Required | Default         |
    /// |---------------------|----------|-----------------|
    /// | `AUTH_JWT_SECRET`   | **yes**  | --              |
    /// | `AUTH_JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let audience =
            std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration and audience.
pub fn validate_token(
    token: &str,
    config: &AuthConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: "authenticated".to_string(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(aud: &str, exp_offset_secs: i64) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            aud: aud.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
            email: Some("freelancer@example.com".into()),
            role: Some("authenticated".into()),
        }
    }

    #[test]
    fn valid_token_round_trips_subject() {
        let config = test_config();
        let claims = claims("authenticated", 3600);
        let token = sign(&claims, &config.secret);

        let decoded = validate_token(&token, &config).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email.as_deref(), Some("freelancer@example.com"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = sign(&claims("authenticated", 3600), "another-secret");
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let config = test_config();
        let token = sign(&claims("anon", 3600), &config.secret);
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        // Past the default 60s leeway.
        let token = sign(&claims("authenticated", -3600), &config.secret);
        assert!(validate_token(&token, &config).is_err());
    }
}
