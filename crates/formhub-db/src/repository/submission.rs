//! SurrealDB implementation of [`SubmissionRepository`].

use chrono::{DateTime, Utc};
use formhub_core::error::FormHubResult;
use formhub_core::models::submission::{CreateSubmission, Submission, SubmissionValues};
use formhub_core::repository::SubmissionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{answers_from_value, answers_to_value, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SubmissionRow {
    form_id: String,
    submitted_by: String,
    answers: serde_json::Value,
    is_edited: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SubmissionRowWithId {
    record_id: String,
    form_id: String,
    submitted_by: String,
    answers: serde_json::Value,
    is_edited: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_submission(row: SubmissionRow, id: Uuid) -> Result<Submission, DbError> {
    Ok(Submission {
        id,
        form_id: parse_uuid("form_id", &row.form_id)?,
        submitted_by: parse_uuid("submitted_by", &row.submitted_by)?,
        values: answers_from_value(row.answers)?,
        is_edited: row.is_edited,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl SubmissionRowWithId {
    fn try_into_submission(self) -> Result<Submission, DbError> {
        let id = parse_uuid("submission id", &self.record_id)?;
        row_to_submission(
            SubmissionRow {
                form_id: self.form_id,
                submitted_by: self.submitted_by,
                answers: self.answers,
                is_edited: self.is_edited,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id,
        )
    }
}

/// SurrealDB implementation of the Submission repository.
#[derive(Clone)]
pub struct SurrealSubmissionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSubmissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn first_or_not_found(rows: Vec<SubmissionRow>, id: Uuid) -> Result<Submission, DbError> {
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "submission".into(),
            id: id.to_string(),
        })?;
        row_to_submission(row, id)
    }
}

impl<C: Connection> SubmissionRepository for SurrealSubmissionRepository<C> {
    async fn create(&self, input: CreateSubmission) -> FormHubResult<Submission> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('submission', $id) SET \
                 form_id = $form_id, \
                 submitted_by = $submitted_by, \
                 answers = $answers, \
                 is_edited = false",
            )
            .bind(("id", id.to_string()))
            .bind(("form_id", input.form_id.to_string()))
            .bind(("submitted_by", input.submitted_by.to_string()))
            .bind(("answers", answers_to_value(&input.values)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_or_not_found(rows, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FormHubResult<Submission> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('submission', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_or_not_found(rows, id)?)
    }

    async fn list_by_form(&self, form_id: Uuid) -> FormHubResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM submission \
                 WHERE form_id = $form_id \
                 ORDER BY created_at DESC",
            )
            .bind(("form_id", form_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_submission())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_form_and_submitter(
        &self,
        form_id: Uuid,
        submitted_by: Uuid,
    ) -> FormHubResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM submission \
                 WHERE form_id = $form_id AND submitted_by = $submitted_by \
                 ORDER BY created_at DESC",
            )
            .bind(("form_id", form_id.to_string()))
            .bind(("submitted_by", submitted_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_submission())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn replace_values(
        &self,
        id: Uuid,
        values: SubmissionValues,
    ) -> FormHubResult<Submission> {
        let result = self
            .db
            .query(
                "UPDATE type::record('submission', $id) SET \
                 answers = $answers, \
                 is_edited = true, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("answers", answers_to_value(&values)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::first_or_not_found(rows, id)?)
    }
}
