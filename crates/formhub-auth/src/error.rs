//! Authentication error types.

use formhub_core::error::FormHubError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(String),

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("could not allocate a unique org code after {attempts} attempts")]
    OrgCodeExhausted { attempts: u32 },

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for FormHubError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => FormHubError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::InvalidInput(message) => FormHubError::Validation { message },
            AuthError::OrgCodeExhausted { .. } => FormHubError::Internal(err.to_string()),
            AuthError::Crypto(msg) => FormHubError::Crypto(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_and_token_failures_are_authentication_errors() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::TokenInvalid("bad".into()),
        ] {
            assert!(matches!(
                FormHubError::from(err),
                FormHubError::AuthenticationFailed { .. }
            ));
        }
    }

    #[test]
    fn invalid_input_keeps_its_message() {
        let err: FormHubError = AuthError::InvalidInput("name is required".into()).into();
        assert!(matches!(err, FormHubError::Validation { ref message } if message == "name is required"));
    }

    #[test]
    fn exhausted_org_codes_are_internal() {
        let err: FormHubError = AuthError::OrgCodeExhausted { attempts: 16 }.into();
        assert!(matches!(err, FormHubError::Internal(_)));
    }
}
