//! Submission domain model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// Answers keyed by form field id.
pub type SubmissionValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub form_id: Uuid,
    pub submitted_by: Uuid,
    /// Current answers. Overwritten in place on edit.
    pub values: SubmissionValues,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmission {
    pub form_id: Uuid,
    pub submitted_by: Uuid,
    pub values: SubmissionValues,
}

/// A submission together with a summary of who submitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEntry {
    #[serde(flatten)]
    pub submission: Submission,
    pub submitter: Option<UserSummary>,
}
