//! FormHub Auth — password verification, org codes, JWT issuance and
//! validation, and the registration/login service.

pub mod config;
pub mod error;
pub mod org_code;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput, RegisterInput, RegisterOutput};
pub use token::{AccessTokenClaims, ValidatedClaims};
