//! Revision domain model.
//!
//! Revisions are append-only snapshots of the values written by each
//! submission edit. They are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submission::SubmissionValues;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub edited_by: Uuid,
    pub values: SubmissionValues,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRevision {
    pub submission_id: Uuid,
    pub edited_by: Uuid,
    pub values: SubmissionValues,
}
