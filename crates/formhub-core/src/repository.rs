//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Ownership and role checks are
//! not performed here; callers run the [`crate::policy`] rules first.

use uuid::Uuid;

use crate::error::FormHubResult;
use crate::models::{
    form::{CreateForm, Form, UpdateForm},
    revision::{CreateRevision, Revision},
    submission::{CreateSubmission, Submission, SubmissionValues},
    user::{CreateUser, User},
};

// ---------------------------------------------------------------------------
// Credential store
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Create a user. When `input.org_code` is set the code is reserved
    /// atomically with the user record; a taken code fails with
    /// `AlreadyExists { entity: "org_code" }` and persists nothing.
    fn create(&self, input: CreateUser) -> impl Future<Output = FormHubResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FormHubResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = FormHubResult<User>> + Send;
    /// Resolve an org code to the admin that owns it.
    fn get_admin_by_org_code(
        &self,
        org_code: &str,
    ) -> impl Future<Output = FormHubResult<User>> + Send;
}

// ---------------------------------------------------------------------------
// Form store
// ---------------------------------------------------------------------------

pub trait FormRepository: Send + Sync {
    fn create(&self, input: CreateForm) -> impl Future<Output = FormHubResult<Form>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FormHubResult<Form>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateForm,
    ) -> impl Future<Output = FormHubResult<Form>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FormHubResult<()>> + Send;
    /// All forms owned by `owner`, newest first.
    fn list_by_owner(&self, owner: Uuid) -> impl Future<Output = FormHubResult<Vec<Form>>> + Send;
}

// ---------------------------------------------------------------------------
// Submission store
// ---------------------------------------------------------------------------

pub trait SubmissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSubmission,
    ) -> impl Future<Output = FormHubResult<Submission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FormHubResult<Submission>> + Send;
    /// All submissions for a form, newest first.
    fn list_by_form(
        &self,
        form_id: Uuid,
    ) -> impl Future<Output = FormHubResult<Vec<Submission>>> + Send;
    /// Submissions for a form authored by one user, newest first.
    fn list_by_form_and_submitter(
        &self,
        form_id: Uuid,
        submitted_by: Uuid,
    ) -> impl Future<Output = FormHubResult<Vec<Submission>>> + Send;
    /// Overwrite the values in place and mark the submission as edited.
    fn replace_values(
        &self,
        id: Uuid,
        values: SubmissionValues,
    ) -> impl Future<Output = FormHubResult<Submission>> + Send;
}

// ---------------------------------------------------------------------------
// Revision store (append-only)
// ---------------------------------------------------------------------------

pub trait RevisionRepository: Send + Sync {
    /// Append a new revision. No update or delete operations exist.
    fn append(&self, input: CreateRevision)
    -> impl Future<Output = FormHubResult<Revision>> + Send;
    /// Revisions of one submission, oldest first.
    fn list_by_submission(
        &self,
        submission_id: Uuid,
    ) -> impl Future<Output = FormHubResult<Vec<Revision>>> + Send;
}
