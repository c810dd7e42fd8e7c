//! Organization code generation.

/// Number of random bytes behind a code; each byte renders as two hex
/// characters.
const ORG_CODE_BYTES: usize = 3;

/// Generate a 6-character uppercase hexadecimal org code, e.g. `A1B2C3`.
///
/// Uniqueness is not checked here; the user repository rejects a code
/// that is already reserved and registration retries with a new one.
pub fn generate_org_code() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; ORG_CODE_BYTES] = rand::Rng::random(&mut rng);
    hex::encode_upper(bytes)
}

/// Canonical form of a code typed in by an employee.
pub fn normalize_org_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
