//! SurrealDB implementation of [`RevisionRepository`].
//!
//! Append-only: the table itself denies update and delete, and this
//! repository offers neither.

use chrono::{DateTime, Utc};
use formhub_core::error::FormHubResult;
use formhub_core::models::revision::{CreateRevision, Revision};
use formhub_core::repository::RevisionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{answers_from_value, answers_to_value, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RevisionRow {
    submission_id: String,
    edited_by: String,
    answers: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RevisionRowWithId {
    record_id: String,
    submission_id: String,
    edited_by: String,
    answers: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl RevisionRow {
    fn into_revision(self, id: Uuid) -> Result<Revision, DbError> {
        Ok(Revision {
            id,
            submission_id: parse_uuid("submission_id", &self.submission_id)?,
            edited_by: parse_uuid("edited_by", &self.edited_by)?,
            values: answers_from_value(self.answers)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Revision repository.
#[derive(Clone)]
pub struct SurrealRevisionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRevisionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RevisionRepository for SurrealRevisionRepository<C> {
    async fn append(&self, input: CreateRevision) -> FormHubResult<Revision> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('revision', $id) SET \
                 submission_id = $submission_id, \
                 edited_by = $edited_by, \
                 answers = $answers",
            )
            .bind(("id", id_str.clone()))
            .bind(("submission_id", input.submission_id.to_string()))
            .bind(("edited_by", input.edited_by.to_string()))
            .bind(("answers", answers_to_value(&input.values)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<RevisionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "revision".into(),
            id: id_str,
        })?;

        Ok(row.into_revision(id)?)
    }

    async fn list_by_submission(&self, submission_id: Uuid) -> FormHubResult<Vec<Revision>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM revision \
                 WHERE submission_id = $submission_id \
                 ORDER BY created_at ASC",
            )
            .bind(("submission_id", submission_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RevisionRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| {
                let id = parse_uuid("revision id", &row.record_id)?;
                RevisionRow {
                    submission_id: row.submission_id,
                    edited_by: row.edited_by,
                    answers: row.answers,
                    created_at: row.created_at,
                }
                .into_revision(id)
                .map_err(Into::into)
            })
            .collect()
    }
}
