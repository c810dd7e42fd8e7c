//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.
//!
//! Admin accounts reserve their org code in the `org_code` table, keyed
//! by the code itself, inside the same transaction that creates the
//! user. Two registrations racing for one code cannot both commit.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use formhub_core::error::FormHubResult;
use formhub_core::models::user::{CreateUser, User, UserRole};
use formhub_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    name: String,
    email: String,
    password_hash: String,
    role: String,
    org_code: Option<String>,
    linked_admin: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    org_code: Option<String>,
    linked_admin: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct OrgCodeRow {
    #[allow(dead_code)]
    admin_id: String,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    UserRole::parse(s).ok_or_else(|| DbError::InvalidRecord(format!("unknown user role: {s}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let linked_admin = self
            .linked_admin
            .as_deref()
            .map(|s| parse_uuid("linked_admin", s))
            .transpose()?;
        Ok(User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            org_code: self.org_code,
            linked_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = parse_uuid("user id", &self.record_id)?;
        UserRow {
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            org_code: self.org_code,
            linked_admin: self.linked_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_user(id)
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    async fn email_taken(&self, email: &str) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?;
        let rows: Vec<UserRowWithId> = result.take(0)?;
        Ok(!rows.is_empty())
    }

    async fn org_code_taken(&self, org_code: &str) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query("SELECT admin_id FROM type::record('org_code', $code)")
            .bind(("code", org_code.to_string()))
            .await?;
        let rows: Vec<OrgCodeRow> = result.take(0)?;
        Ok(!rows.is_empty())
    }

    /// Work out why a failed create failed: a lost race on a unique
    /// value, or something else.
    async fn classify_create_failure(
        &self,
        email: &str,
        org_code: Option<&str>,
        cause: String,
    ) -> DbError {
        if let Some(code) = org_code {
            if matches!(self.org_code_taken(code).await, Ok(true)) {
                return DbError::AlreadyExists {
                    entity: "org_code".into(),
                };
            }
        }
        if matches!(self.email_taken(email).await, Ok(true)) {
            return DbError::AlreadyExists {
                entity: "user".into(),
            };
        }
        DbError::Query(cause)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> FormHubResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        if self.email_taken(&input.email).await? {
            return Err(DbError::AlreadyExists {
                entity: "user".into(),
            }
            .into());
        }
        if let Some(code) = input.org_code.as_deref() {
            if self.org_code_taken(code).await? {
                return Err(DbError::AlreadyExists {
                    entity: "org_code".into(),
                }
                .into());
            }
        }

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let create_user = "CREATE type::record('user', $id) SET \
             name = $name, email = $email, \
             password_hash = $password_hash, \
             role = $role, \
             org_code = $org_code, \
             linked_admin = $linked_admin";

        let query = if input.org_code.is_some() {
            format!(
                "BEGIN TRANSACTION; \
                 CREATE type::record('org_code', $org_code) SET admin_id = $id; \
                 {create_user}; \
                 COMMIT TRANSACTION;"
            )
        } else {
            create_user.to_string()
        };

        let email = input.email.clone();
        let org_code = input.org_code.clone();

        let result = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("org_code", input.org_code))
            .bind(("linked_admin", input.linked_admin.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        if let Err(e) = result.check() {
            return Err(self
                .classify_create_failure(&email, org_code.as_deref(), e.to_string())
                .await
                .into());
        }

        debug!(user_id = %id, "user record created");
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> FormHubResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> FormHubResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn get_admin_by_org_code(&self, org_code: &str) -> FormHubResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE org_code = $org_code AND role = 'admin'",
            )
            .bind(("org_code", org_code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: format!("org_code={org_code}"),
        })?;

        Ok(row.try_into_user()?)
    }
}
