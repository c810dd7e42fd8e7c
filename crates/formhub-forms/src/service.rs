//! Form and submission service.
//!
//! Each operation loads the records it needs, asks
//! [`formhub_core::policy`] whether the caller may proceed, validates
//! input, and only then writes.

use std::collections::HashMap;

use formhub_core::error::{FormHubError, FormHubResult};
use formhub_core::models::form::{CreateForm, Form, FormField, UpdateForm};
use formhub_core::models::revision::{CreateRevision, Revision};
use formhub_core::models::submission::{
    CreateSubmission, Submission, SubmissionEntry, SubmissionValues,
};
use formhub_core::models::user::UserSummary;
use formhub_core::policy::{self, Caller, FormListScope, SubmissionListScope};
use formhub_core::repository::{
    FormRepository, RevisionRepository, SubmissionRepository, UserRepository,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::validation;

pub struct FormService<U, F, S, R>
where
    U: UserRepository,
    F: FormRepository,
    S: SubmissionRepository,
    R: RevisionRepository,
{
    users: U,
    forms: F,
    submissions: S,
    revisions: R,
}

impl<U, F, S, R> FormService<U, F, S, R>
where
    U: UserRepository,
    F: FormRepository,
    S: SubmissionRepository,
    R: RevisionRepository,
{
    pub fn new(users: U, forms: F, submissions: S, revisions: R) -> Self {
        Self {
            users,
            forms,
            submissions,
            revisions,
        }
    }

    // -------------------------------------------------------------------
    // Forms
    // -------------------------------------------------------------------

    pub async fn create_form(
        &self,
        caller: &Caller,
        name: String,
        fields: Vec<FormField>,
    ) -> FormHubResult<Form> {
        policy::authorize_form_create(caller)?;
        validation::validate_form_definition(&name, &fields)?;

        let form = self
            .forms
            .create(CreateForm {
                name: name.trim().to_string(),
                fields,
                created_by: caller.user_id,
            })
            .await?;

        info!(form_id = %form.id, owner = %caller.user_id, "form created");
        Ok(form)
    }

    /// Forms visible to the caller, newest first. An employee without a
    /// linked admin gets an empty list.
    pub async fn list_forms(&self, caller: &Caller) -> FormHubResult<Vec<Form>> {
        match policy::form_list_scope(caller) {
            FormListScope::OwnedBy(owner) => self.forms.list_by_owner(owner).await,
            FormListScope::Nothing => Ok(Vec::new()),
        }
    }

    pub async fn get_form(&self, caller: &Caller, form_id: Uuid) -> FormHubResult<Form> {
        let form = self.forms.get_by_id(form_id).await?;
        policy::authorize_form_read(caller, &form)?;
        Ok(form)
    }

    pub async fn update_form(
        &self,
        caller: &Caller,
        form_id: Uuid,
        input: UpdateForm,
    ) -> FormHubResult<Form> {
        let form = self.forms.get_by_id(form_id).await?;
        policy::authorize_form_write(caller, &form)?;
        validation::validate_form_definition(&input.name, &input.fields)?;

        let updated = self
            .forms
            .update(
                form_id,
                UpdateForm {
                    name: input.name.trim().to_string(),
                    fields: input.fields,
                },
            )
            .await?;

        info!(form_id = %form_id, "form updated");
        Ok(updated)
    }

    /// Delete a form. Its submissions and revisions stay in storage but
    /// become unreachable, since every submission read goes through the
    /// parent form.
    pub async fn delete_form(&self, caller: &Caller, form_id: Uuid) -> FormHubResult<()> {
        let form = self.forms.get_by_id(form_id).await?;
        policy::authorize_form_write(caller, &form)?;

        self.forms.delete(form_id).await?;

        info!(form_id = %form_id, "form deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------

    pub async fn create_submission(
        &self,
        caller: &Caller,
        form_id: Uuid,
        values: SubmissionValues,
    ) -> FormHubResult<Submission> {
        let form = self.forms.get_by_id(form_id).await?;
        policy::authorize_submission_create(caller, &form)?;
        validation::validate_values(&form, &values)?;

        let submission = self
            .submissions
            .create(CreateSubmission {
                form_id,
                submitted_by: caller.user_id,
                values,
            })
            .await?;

        info!(
            submission_id = %submission.id,
            form_id = %form_id,
            submitted_by = %caller.user_id,
            "submission created"
        );
        Ok(submission)
    }

    /// Submissions of one form, newest first, each with a summary of its
    /// submitter. Admins see every submission of a form they own;
    /// employees see their own.
    pub async fn list_submissions(
        &self,
        caller: &Caller,
        form_id: Uuid,
    ) -> FormHubResult<Vec<SubmissionEntry>> {
        let form = self.forms.get_by_id(form_id).await?;

        let submissions = match policy::submission_list_scope(caller, &form)? {
            SubmissionListScope::All => self.submissions.list_by_form(form_id).await?,
            SubmissionListScope::SubmittedBy(author) => {
                self.submissions
                    .list_by_form_and_submitter(form_id, author)
                    .await?
            }
        };

        let mut submitters: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
        for submission in &submissions {
            if !submitters.contains_key(&submission.submitted_by) {
                let summary = self.submitter_summary(submission.submitted_by).await?;
                submitters.insert(submission.submitted_by, summary);
            }
        }

        debug!(form_id = %form_id, count = submissions.len(), "listed submissions");

        Ok(submissions
            .into_iter()
            .map(|submission| SubmissionEntry {
                submitter: submitters
                    .get(&submission.submitted_by)
                    .cloned()
                    .flatten(),
                submission,
            })
            .collect())
    }

    pub async fn get_submission(
        &self,
        caller: &Caller,
        submission_id: Uuid,
    ) -> FormHubResult<Submission> {
        let (_, submission) = self.load_accessible(caller, submission_id).await?;
        Ok(submission)
    }

    /// Replace a submission's values.
    ///
    /// A revision holding the new values is appended first, then the
    /// submission is overwritten and flagged as edited. Concurrent edits
    /// are last-write-wins; each still leaves its own revision.
    pub async fn edit_submission(
        &self,
        caller: &Caller,
        submission_id: Uuid,
        values: SubmissionValues,
    ) -> FormHubResult<Submission> {
        let (form, _) = self.load_accessible(caller, submission_id).await?;
        validation::validate_values(&form, &values)?;

        let revision = self
            .revisions
            .append(CreateRevision {
                submission_id,
                edited_by: caller.user_id,
                values: values.clone(),
            })
            .await?;

        let updated = self
            .submissions
            .replace_values(submission_id, values)
            .await?;

        info!(
            submission_id = %submission_id,
            revision_id = %revision.id,
            edited_by = %caller.user_id,
            "submission edited"
        );
        Ok(updated)
    }

    /// Edit history of a submission, oldest first.
    pub async fn list_revisions(
        &self,
        caller: &Caller,
        submission_id: Uuid,
    ) -> FormHubResult<Vec<Revision>> {
        self.load_accessible(caller, submission_id).await?;
        self.revisions.list_by_submission(submission_id).await
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    /// Load a submission and its parent form, then check access.
    async fn load_accessible(
        &self,
        caller: &Caller,
        submission_id: Uuid,
    ) -> FormHubResult<(Form, Submission)> {
        let submission = self.submissions.get_by_id(submission_id).await?;
        let form = self.forms.get_by_id(submission.form_id).await?;
        policy::authorize_submission_access(caller, &form, &submission)?;
        Ok((form, submission))
    }

    async fn submitter_summary(&self, user_id: Uuid) -> FormHubResult<Option<UserSummary>> {
        match self.users.get_by_id(user_id).await {
            Ok(user) => Ok(Some(UserSummary::from(&user))),
            Err(FormHubError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
