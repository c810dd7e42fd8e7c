//! Password policy and Argon2id verification.

use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

/// Check a registration password against the length policy.
///
/// Length is counted in characters so multi-byte passphrases are not
/// penalised.
pub fn check_password_policy(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password is required".into()));
    }
    if password.chars().count() < min_length {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {min_length} characters"
        )));
    }
    Ok(())
}

/// Verify a plaintext password against a PHC-format Argon2id hash.
///
/// The pepper, when set, is prepended to the password exactly as the
/// user repository does before hashing. Cost parameters are read from
/// the stored hash.
///
/// Returns `Ok(false)` on mismatch and `Err(AuthError::Crypto)` when the
/// stored hash cannot be parsed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let input = match pepper {
        Some(p) => format!("{p}{password}"),
        None => password.to_owned(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(input.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}
