//! Authentication service — registration and login orchestration.

use std::fmt;

use formhub_core::error::{FormHubError, FormHubResult};
use formhub_core::models::user::{CreateUser, User, UserRole};
use formhub_core::repository::UserRepository;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::org_code;
use crate::password;
use crate::token::{self, ValidatedClaims};

/// Input for the registration flow.
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to [`UserRole::User`] when omitted.
    pub role: Option<UserRole>,
    /// Required for employees; ignored for admins.
    pub org_code: Option<String>,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("org_code", &self.org_code)
            .finish()
    }
}

/// Successful registration result.
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
}

impl RegisterOutput {
    /// The org code issued to a freshly registered admin.
    pub fn org_code(&self) -> Option<&str> {
        self.user.org_code.as_deref()
    }
}

/// Input for the login flow.
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Trim and lower-case an email for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn require(value: &str, field: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register an admin (who receives a fresh org code) or an employee
    /// (who joins the admin owning the supplied org code).
    pub async fn register(&self, input: RegisterInput) -> FormHubResult<RegisterOutput> {
        require(&input.name, "name")?;
        require(&input.email, "email")?;
        password::check_password_policy(&input.password, self.config.min_password_length)?;

        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);
        let role = input.role.unwrap_or_default();

        let user = match role {
            UserRole::Admin => self.register_admin(name, email, input.password).await?,
            UserRole::User => {
                let raw_code = input
                    .org_code
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| AuthError::InvalidInput("orgCode is required".into()))?;
                let code = org_code::normalize_org_code(raw_code);

                let admin = self.user_repo.get_admin_by_org_code(&code).await?;

                self.user_repo
                    .create(CreateUser {
                        name,
                        email,
                        password: input.password,
                        role: UserRole::User,
                        org_code: None,
                        linked_admin: Some(admin.id),
                    })
                    .await?
            }
        };

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(RegisterOutput { user })
    }

    async fn register_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> FormHubResult<User> {
        let attempts = self.config.max_org_code_attempts;

        for attempt in 1..=attempts {
            let code = org_code::generate_org_code();
            let result = self
                .user_repo
                .create(CreateUser {
                    name: name.clone(),
                    email: email.clone(),
                    password: password.clone(),
                    role: UserRole::Admin,
                    org_code: Some(code),
                    linked_admin: None,
                })
                .await;

            match result {
                Ok(user) => return Ok(user),
                Err(FormHubError::AlreadyExists { entity }) if entity == "org_code" => {
                    debug!(attempt, "org code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts, "org code space exhausted during registration");
        Err(AuthError::OrgCodeExhausted { attempts }.into())
    }

    /// Verify email + password and issue an access token.
    ///
    /// Blank fields are a validation error. An unknown email and a wrong
    /// password fail identically.
    pub async fn login(&self, input: LoginInput) -> FormHubResult<LoginOutput> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::InvalidInput("email and password are required".into()).into());
        }

        let user = match self.user_repo.get_by_email(&email).await {
            Ok(u) => u,
            Err(FormHubError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_access_token(user.id, user.role, &self.config)?;

        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            user,
        })
    }

    /// Validate a bearer token. Stateless.
    pub fn authenticate(&self, bearer: &str) -> FormHubResult<ValidatedClaims> {
        Ok(token::validate_access_token(bearer, &self.config)?)
    }

    /// Load the full user behind a validated token.
    pub async fn current_user(&self, claims: &ValidatedClaims) -> FormHubResult<User> {
        match self.user_repo.get_by_id(claims.user_id).await {
            Ok(user) => Ok(user),
            Err(FormHubError::NotFound { .. }) => {
                Err(AuthError::TokenInvalid("subject no longer exists".into()).into())
            }
            Err(e) => Err(e),
        }
    }
}
