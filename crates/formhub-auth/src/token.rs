//! JWT access token issuance and verification (HS256).

use chrono::Utc;
use formhub_core::models::user::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    /// Role at the time of issue.
    pub role: UserRole,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

/// Issue a signed HS256 access token for a user.
pub fn issue_access_token(
    user_id: Uuid,
    role: UserRole,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(config.access_token_lifetime_secs)
        .ok()
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or_else(|| AuthError::Crypto("access token lifetime out of range".into()))?;
    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        role,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 access token.
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Caller identity taken from a token whose signature, expiry and
/// issuer were checked.
#[derive(Debug, Clone)]
pub struct ValidatedClaims {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Validate an access token and return the caller it names.
///
/// Stateless: no database lookup is performed. Callers that need the
/// linked admin load the user afterwards.
pub fn validate_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    let claims = decode_access_token(token, config)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))?;
    Ok(ValidatedClaims {
        user_id,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-with-enough-entropy".into(),
            jwt_issuer: "formhub-test".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn jwt_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = issue_access_token(user_id, UserRole::Admin, &config).unwrap();
        let claims = decode_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.iss, "formhub-test");
        assert_eq!(claims.exp - claims.iat, 3600);

        let validated = validate_access_token(&token, &config).unwrap();
        assert_eq!(validated.user_id, user_id);
        assert_eq!(validated.role, UserRole::Admin);
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        for lifetime in [u64::MAX, i64::MAX as u64] {
            let config = AuthConfig {
                access_token_lifetime_secs: lifetime,
                ..test_config()
            };
            let err = issue_access_token(Uuid::new_v4(), UserRole::User, &config).unwrap_err();
            assert!(matches!(err, AuthError::Crypto(_)));
        }
    }

    #[test]
    fn jti_is_unique() {
        let config = test_config();
        let uid = Uuid::new_v4();

        let t1 = issue_access_token(uid, UserRole::User, &config).unwrap();
        let t2 = issue_access_token(uid, UserRole::User, &config).unwrap();

        let c1 = decode_access_token(&t1, &config).unwrap();
        let c2 = decode_access_token(&t2, &config).unwrap();
        assert_ne!(c1.jti, c2.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue_access_token(Uuid::new_v4(), UserRole::User, &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret".into(),
            ..test_config()
        };
        assert!(matches!(
            validate_access_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let token = issue_access_token(Uuid::new_v4(), UserRole::User, &config).unwrap();

        let other = AuthConfig {
            jwt_issuer: "someone-else".into(),
            ..test_config()
        };
        assert!(validate_access_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            role: UserRole::User,
            iss: config.jwt_issuer.clone(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_access_token(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let config = test_config();
        assert!(matches!(
            validate_access_token("not.a.jwt", &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: "not-a-uuid".into(),
            role: UserRole::Admin,
            iss: config.jwt_issuer.clone(),
            iat: now,
            exp: now + 60,
            jti: Uuid::new_v4().to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_access_token(&token, &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }
}
