//! Database-specific error types and conversions.

use formhub_core::error::FormHubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl From<DbError> for FormHubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FormHubError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => FormHubError::AlreadyExists { entity },
            DbError::Hash(msg) => FormHubError::Crypto(msg),
            other => FormHubError::Database(other.to_string()),
        }
    }
}
