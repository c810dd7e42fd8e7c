//! SurrealDB repository implementations.

mod form;
mod revision;
mod submission;
mod user;

pub use form::SurrealFormRepository;
pub use revision::SurrealRevisionRepository;
pub use submission::SurrealSubmissionRepository;
pub use user::SurrealUserRepository;

use formhub_core::models::submission::SubmissionValues;
use uuid::Uuid;

use crate::error::DbError;

/// Parse a UUID stored as a string column.
pub(crate) fn parse_uuid(column: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::InvalidRecord(format!("invalid {column} UUID: {e}")))
}

/// Answers are stored as a flexible object keyed by field id.
pub(crate) fn answers_to_value(values: &SubmissionValues) -> serde_json::Value {
    serde_json::Value::Object(
        values
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

pub(crate) fn answers_from_value(value: serde_json::Value) -> Result<SubmissionValues, DbError> {
    serde_json::from_value(value)
        .map_err(|e| DbError::InvalidRecord(format!("answers are not a string map: {e}")))
}
